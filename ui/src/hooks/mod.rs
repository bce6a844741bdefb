pub mod use_wallet_session;
