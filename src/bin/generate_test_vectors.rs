// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Prints reproducible protocol transcripts as JSON.
//!
//! ```bash
//! cargo run --features vectors --bin generate-test-vectors -- --count 2 --batch 3
//! ```

use anyhow::{ensure, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Parser;
use dleq_voprf::{
    CipherSuite, Group, Ristretto255, VoprfClient, VoprfServer, VoprfServerBatchEvaluateResult,
};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_RNG_SEED: &str = "0101010101010101010101010101010101010101010101010101010101010101";

/// Generate deterministic VOPRF test vectors
#[derive(Parser)]
#[command(name = "generate-test-vectors")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of independent vectors, each under a fresh key
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Tokens evaluated per vector; more than one produces a batch proof
    #[arg(short, long, default_value_t = 1)]
    batch: usize,

    /// 32-byte ChaCha20 seed, hex-encoded
    #[arg(short, long, default_value = DEFAULT_RNG_SEED)]
    seed: String,

    /// Log each protocol step to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct TestVectors {
    suite: &'static str,
    rng_seed: String,
    vectors: Vec<TestVector>,
}

#[derive(Serialize)]
struct TestVector {
    private_key: String,
    public_key: String,
    tokens: Vec<TokenVector>,
    proof: String,
    batch: bool,
    redeem_message: String,
}

#[derive(Serialize)]
struct TokenVector {
    seed: String,
    blind: String,
    blinded: String,
    evaluated: String,
    unblinded: String,
    output: String,
    signature: String,
}

const REDEEM_MESSAGE: &[u8] = b"test message";

fn encode(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn generate(rng: &mut ChaCha20Rng, batch: usize) -> Result<TestVector> {
    let server = VoprfServer::<Ristretto255>::new(rng)?;
    debug!(public_key = %hex::encode(server.get_public_key().serialize()), "generated key");

    let mut clients = Vec::with_capacity(batch);
    let mut messages = Vec::with_capacity(batch);
    for _ in 0..batch {
        let client_blind_result = VoprfClient::<Ristretto255>::blind_random(rng)?;
        debug!(seed = %hex::encode(client_blind_result.state.seed()), "blinded token");
        clients.push(client_blind_result.state);
        messages.push(client_blind_result.message);
    }

    let public_key = server.get_public_key();
    let (evaluated, unblinded, proof) = if batch == 1 {
        let server_result = server.blind_evaluate(rng, &messages[0])?;
        let token =
            clients[0].finalize(&server_result.message, &server_result.proof, &public_key)?;
        (
            vec![server_result.message],
            vec![token],
            server_result.proof.serialize(),
        )
    } else {
        let VoprfServerBatchEvaluateResult {
            messages: evaluated,
            proof,
        } = server.batch_blind_evaluate(rng, &messages)?;
        let tokens = VoprfClient::batch_finalize(&clients, &evaluated, &proof, &public_key)?;
        (evaluated, tokens, proof.serialize())
    };
    debug!(tokens = batch, "verified evaluation proof");

    let tokens = clients
        .iter()
        .zip(&messages)
        .zip(evaluated.iter().zip(&unblinded))
        .map(|((client, message), (evaluated, unblinded))| {
            let signature = unblinded
                .derive_verification_key()?
                .sign(REDEEM_MESSAGE)?;
            server.redeem(client.seed(), REDEEM_MESSAGE, &signature)?;

            Ok(TokenVector {
                seed: encode(client.seed()),
                blind: encode(Ristretto255::serialize_scalar(client.get_blind())),
                blinded: encode(message.serialize()),
                evaluated: encode(evaluated.serialize()),
                unblinded: encode(Ristretto255::serialize_elem(unblinded.value())),
                output: encode(unblinded.output()?),
                signature: encode(signature.serialize()),
            })
        })
        .collect::<Result<_>>()?;

    Ok(TestVector {
        private_key: encode(server.serialize()),
        public_key: encode(public_key.serialize()),
        tokens,
        proof: encode(proof),
        batch: batch > 1,
        redeem_message: encode(REDEEM_MESSAGE),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    ensure!(cli.batch > 0, "--batch must be at least 1");

    let seed: [u8; 32] = hex::decode(&cli.seed)
        .context("--seed is not valid hex")?
        .try_into()
        .map_err(|_| anyhow::anyhow!("--seed must be exactly 32 bytes"))?;
    let mut rng = ChaCha20Rng::from_seed(seed);

    info!(count = cli.count, batch = cli.batch, "generating test vectors");

    let vectors = (0..cli.count)
        .map(|i| {
            generate(&mut rng, cli.batch).with_context(|| format!("failed to generate vector {i}"))
        })
        .collect::<Result<_>>()?;

    let output = TestVectors {
        suite: <Ristretto255 as CipherSuite>::ID,
        rng_seed: cli.seed,
        vectors,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
