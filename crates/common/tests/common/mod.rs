//! Shared test utilities for envelope and keystore integration tests
#![allow(dead_code)]

use std::sync::OnceLock;

use ::common::crypto::{SecretKey, DEFAULT_KEY_BITS};
use ::common::envelope::StaticDirectory;

/// RSA keygen is slow; generate each party's key once per test binary
pub struct Parties {
    pub alice: SecretKey,
    pub bob: SecretKey,
    pub carol: SecretKey,
}

pub fn parties() -> &'static Parties {
    static PARTIES: OnceLock<Parties> = OnceLock::new();
    PARTIES.get_or_init(|| Parties {
        alice: SecretKey::generate(DEFAULT_KEY_BITS).unwrap(),
        bob: SecretKey::generate(DEFAULT_KEY_BITS).unwrap(),
        carol: SecretKey::generate(DEFAULT_KEY_BITS).unwrap(),
    })
}

/// A directory that knows every party's real public key
pub fn directory() -> StaticDirectory {
    let p = parties();
    StaticDirectory::new()
        .with("alice", p.alice.public().to_pem().unwrap())
        .with("bob", p.bob.public().to_pem().unwrap())
        .with("carol", p.carol.public().to_pem().unwrap())
}
