//! Behavioural scenarios for keypair creation policies.

mod keypair;
