mod golden;
mod live;
mod reference;

use chrono::{TimeZone, Utc};
use ec2sign_aws_v4::{Credential, TimeContext};
use std::env;

/// Test secret from the AWS signing documentation.
pub const TEST_ACCESS_KEY: &str = "AKIDEXAMPLE";
pub const TEST_SECRET_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

pub fn test_credential() -> Credential {
    Credential::new(TEST_ACCESS_KEY, TEST_SECRET_KEY)
}

/// `20190101T000000Z`
pub fn test_time() -> TimeContext {
    TimeContext::new(
        Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0)
            .single()
            .expect("must be valid"),
    )
}

/// Returns true if live tests against EC2 are enabled.
pub fn live_test_enabled() -> bool {
    let _ = env_logger::builder().is_test(true).try_init();

    env::var("EC2SIGN_AWS_V4_TEST").as_deref() == Ok("on")
}
