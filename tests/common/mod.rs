#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use mixin_composer::{capability, mixin};

capability! {
    pub trait A {
        fn a(&self) -> String;
    }
}

capability! {
    pub trait B {
        fn b(&self) -> String;
    }
}

capability! {
    pub trait AB: A + B {}
}

capability! {
    pub trait Parser {
        fn parse(&self, input: String) -> Result<u32, ParseError>;
    }
}

capability! {
    pub trait Fragile {
        fn snap(&self);
    }
}

capability! {
    pub trait Ticker {
        fn tick(&self) -> u32;
        fn add(&self, amount: u32, label: String) -> String;
    }
}

capability! {
    pub trait Relay {
        fn forward(&self, msg: String) -> String;
        fn composition(&self) -> String;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

pub struct StubA;

impl A for StubA {
    fn a(&self) -> String {
        "a".to_string()
    }
}

mixin!(StubA => A);

pub struct StubB;

impl B for StubB {
    fn b(&self) -> String {
        "b".to_string()
    }
}

mixin!(StubB => B);

/// Answers `a` with a fixed tag, to tell overlapping providers apart.
pub struct TaggedA(pub &'static str);

impl A for TaggedA {
    fn a(&self) -> String {
        self.0.to_string()
    }
}

mixin!(TaggedA => A);

pub struct Both;

impl A for Both {
    fn a(&self) -> String {
        "both-a".to_string()
    }
}

impl B for Both {
    fn b(&self) -> String {
        "both-b".to_string()
    }
}

mixin!(Both => A, B);

/// Declares only `AB`, reaching `A` and `B` through its supertraits.
pub struct Combo;

impl A for Combo {
    fn a(&self) -> String {
        "combo-a".to_string()
    }
}

impl B for Combo {
    fn b(&self) -> String {
        "combo-b".to_string()
    }
}

impl AB for Combo {}

mixin!(Combo => AB);

pub struct Echo;

impl Relay for Echo {
    fn forward(&self, msg: String) -> String {
        format!("echo:{msg}")
    }

    fn composition(&self) -> String {
        "echo".to_string()
    }
}

mixin!(Echo => Relay);

pub struct StubParser;

impl Parser for StubParser {
    fn parse(&self, input: String) -> Result<u32, ParseError> {
        input.parse().map_err(|_| ParseError(input))
    }
}

mixin!(StubParser => Parser);

pub struct Glass;

impl Fragile for Glass {
    fn snap(&self) {
        panic!("shattered")
    }
}

mixin!(Glass => Fragile);

#[derive(Default)]
pub struct Counter {
    pub hits: AtomicU32,
}

impl Ticker for Counter {
    fn tick(&self) -> u32 {
        self.hits.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn add(&self, amount: u32, label: String) -> String {
        let total = self.hits.fetch_add(amount, Ordering::SeqCst) + amount;
        format!("{label}={total}")
    }
}

mixin!(Counter => Ticker);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
