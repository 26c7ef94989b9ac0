//! Server-side CAPTCHA token verification.

mod verifier;

pub use verifier::CaptchaVerifier;
