use rand::distr::{Distribution, StandardUniform};
use rand::Rng;

use crate::{BaseField, ScalarField};

/// Helper trait for sampling random field elements.
pub trait RandomField: Sized {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl RandomField for BaseField {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }
}

impl RandomField for ScalarField {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let a: Vec<ScalarField> = {
            let mut rng = StdRng::seed_from_u64(7);
            (0..4).map(|_| ScalarField::random(&mut rng)).collect()
        };
        let b: Vec<ScalarField> = {
            let mut rng = StdRng::seed_from_u64(7);
            (0..4).map(|_| ScalarField::random(&mut rng)).collect()
        };
        assert_eq!(a, b);
        assert_ne!(a[0], a[1]);
    }

    #[test]
    fn test_base_field_samples_are_canonical() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..32 {
            let x = BaseField::random(&mut rng);
            assert_eq!(BaseField::from_bytes_be(&x.to_bytes_be()), Some(x));
        }
    }
}
