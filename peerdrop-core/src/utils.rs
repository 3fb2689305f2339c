pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";

/// Label of the single data channel opened per peer session.
pub const DATA_CHANNEL_LABEL: &str = "data";

/// Length of client-generated room tokens.
pub const ROOM_ID_LEN: usize = 8;
