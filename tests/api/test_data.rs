//! Shared test data constants to avoid magic strings across integration tests

pub const TEST_RUN_STAMP: &str = "1718000000";

pub const USER_A_ID: &str = "11111111-1111-1111-1111-111111111111";
pub const USER_B_ID: &str = "22222222-2222-2222-2222-222222222222";
pub const USER_C_ID: &str = "33333333-3333-3333-3333-333333333333";

pub const TOKEN_A: &str = "token-user-a";
pub const TOKEN_B: &str = "token-user-b";
pub const TOKEN_C: &str = "token-user-c";

pub const CONVERSATION_ID: &str = "conv-1";
