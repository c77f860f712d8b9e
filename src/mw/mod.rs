pub mod player_mw;
pub mod request_mw;
