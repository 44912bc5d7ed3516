use std::sync::OnceLock;

use crate::group::{ct_lookup, ScalarBits, WINDOW_COUNT, WINDOW_SIZE};
use crate::{Affine, Group, Projective, ScalarField};

/// `table[i][j] = j * 16^i * G`, normalized to Z = 1.
type GeneratorTable = Vec<[Projective; WINDOW_SIZE]>;

static GENERATOR_TABLE: OnceLock<GeneratorTable> = OnceLock::new();

fn build_table() -> GeneratorTable {
    let mut table = Vec::with_capacity(WINDOW_COUNT);
    let mut base = Projective::generator();

    for _ in 0..WINDOW_COUNT {
        let row = Projective::window_table(&base);
        let normalized = Projective::batch_normalize(&row);
        let mut entries = [Projective::INFINITY; WINDOW_SIZE];
        for (entry, point) in entries.iter_mut().zip(&normalized) {
            *entry = Projective::from_affine(point);
        }
        table.push(entries);

        for _ in 0..4 {
            base = base.double();
        }
    }

    table
}

/// Shared, lazily built table of generator multiples.
pub(crate) fn generator_table() -> &'static GeneratorTable {
    GENERATOR_TABLE.get_or_init(build_table)
}

/// Constant-time `scalar * G`: one table lookup per window and no doublings.
pub(crate) fn mul_generator(scalar: &ScalarField) -> Projective {
    let table = generator_table();
    let mut result = Projective::INFINITY;
    for (window, row) in table.iter().enumerate() {
        result += ct_lookup(row, scalar.nibble(window));
    }
    result
}

/// Variable-time `scalar * G` for public scalars.
pub(crate) fn mul_generator_vartime(scalar: &ScalarField) -> Projective {
    let table = generator_table();
    let mut result = Projective::INFINITY;
    for (window, row) in table.iter().enumerate() {
        let digit = scalar.nibble(window);
        if digit != 0 {
            result += row[digit];
        }
    }
    result
}

/// Multiply the fixed generator, returning affine coordinates.
pub fn mul_generator_affine(scalar: &ScalarField) -> Affine {
    mul_generator(scalar).to_affine()
}
