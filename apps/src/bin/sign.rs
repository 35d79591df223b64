use std::fs;
use std::path::PathBuf;

use alloy_primitives::{hex, Address, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use anyhow::{Context, Result};
use clap::Parser;
use common::{
    typed_data::parse_typed_data, MessageData, PackedSignature, SignatureEncoding, SigningScheme,
    SignatureVerifier,
};

/// CLI to sign a message or EIP-712 document and print what the validate
/// tool needs: digest, signature, r/s/v, and signer.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Plain-text (or 0x hex) message to sign with EIP-191.
    #[clap(long, conflicts_with = "typed_data", required_unless_present = "typed_data")]
    message: Option<String>,

    /// Path to a JSON file holding EIP-712 typed data.
    #[clap(long, value_name = "FILE")]
    typed_data: Option<PathBuf>,

    /// Optional private key to use for signing; if omitted, a random key is generated.
    #[clap(long, env = "USER_PRIVATE_KEY")]
    private_key: Option<PrivateKeySigner>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let message = match &args.typed_data {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let typed = parse_typed_data(&text)?
                .with_context(|| format!("{} is not EIP-712 typed data", path.display()))?;
            MessageData::from(typed)
        }
        None => MessageData::Text(args.message.context("--message or --typed-data is required")?),
    };

    let scheme = SigningScheme::classify(&message)?;
    let digest: B256 = scheme.prehash()?;

    let signer = match args.private_key {
        Some(pk) => pk,
        None => PrivateKeySigner::random(),
    };
    let signer_address: Address = signer.address();

    let signature = PackedSignature::from(signer.sign_hash_sync(&digest)?);
    let valid = SignatureVerifier::new().verify(
        signer_address,
        &message,
        &SignatureEncoding::from(signature),
    )?;

    println!("Scheme: {}", scheme.name());
    println!("Digest: {digest}");
    println!("Signature: {signature}");
    println!("r: 0x{}", hex::encode(signature.r()));
    println!("s: 0x{}", hex::encode(signature.s()));
    println!("v: {}", signature.v());
    println!("Signer: {signer_address:#x}");
    println!("Self-check: {}", if valid { "valid" } else { "INVALID" });

    Ok(())
}
