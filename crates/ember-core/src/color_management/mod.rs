//! Color management — gamma transfer, ACES tone curve, and white balance.

pub mod aces;
pub mod transfer;
pub mod white_balance;
