pub mod resolve_withdraw;
