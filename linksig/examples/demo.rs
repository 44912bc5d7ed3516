use linksig::codec::{decode_hex, encode_keys};
use linksig::{
    Config, Engine, HexEncoding, KeyPair, RingSignature, Signature, SigningKey, VerifyingKey, sm3,
};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("log filter");
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // SM2: key from SM3(0x00), message given as hex.
    let sk = SigningKey::from_bytes(&sm3(&[0x00]).to_bytes()).expect("private key");
    let keys = KeyPair::from_signing_key(sk);
    println!("privateKey = {}", keys.signing_key().to_hex());
    println!("publicKey = {}", keys.verifying_key().to_hex());

    let engine = Engine::default();
    let msg = decode_hex("0xffff").expect("message hex");
    let sig = engine.sign(keys.signing_key(), &msg).expect("sign");
    println!("sig = {}", sig.to_hex());

    let sk_bytes = bincode::serialize(keys.signing_key()).expect("serialize sk");
    let vk_bytes = bincode::serialize(keys.verifying_key()).expect("serialize vk");
    let sig_bytes = bincode::serialize(&sig).expect("serialize sig");

    let _sk: SigningKey = bincode::deserialize(&sk_bytes).expect("deserialize sk");
    let vk: VerifyingKey = bincode::deserialize(&vk_bytes).expect("deserialize vk");
    let sig: Signature = bincode::deserialize(&sig_bytes).expect("deserialize sig");
    println!("verify result = {}", engine.verify(&vk, &msg, &sig));

    // Linkable ring signature under a per-poll link domain.
    let poll = Engine::new(Config::default().with_link_domain("poll-2024-05"));
    let decoys = poll.generate_decoys(b"demo decoys", 5).expect("decoys");
    let ring_sig = poll
        .ring_sign(b"demo nonce", keys.signing_key(), &decoys, b"vote: yes")
        .expect("ring sign");
    let ring = decoys.ring_with(keys.verifying_key());
    for key in encode_keys(&ring) {
        println!("ring member = {key}");
    }
    println!("tag = {}", ring_sig.tag().to_hex());

    let ring_sig = RingSignature::from_hex(&ring_sig.to_hex()).expect("decode ring signature");
    println!(
        "ring verify result = {}",
        poll.ring_verify(b"vote: yes", &ring, &ring_sig)
    );
}
