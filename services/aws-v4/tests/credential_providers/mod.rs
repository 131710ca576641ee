mod env;
mod profile;
mod signer;
