// libs/payment-cell/src/services/signature.rs
//
// Stripe-Signature header: `t=<unix seconds>,v1=<hex hmac-sha256>[,v1=...]`,
// where the MAC covers `"{t}.{raw body}"`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::models::PaymentError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed event, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

fn mac_for(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, PaymentError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| PaymentError::InvalidSignature("unusable webhook secret".to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Builds a header value the way the gateway does.
pub fn signature_header(payload: &[u8], secret: &str, timestamp: i64) -> Result<String, PaymentError> {
    let signature = mac_for(secret, timestamp, payload)?.finalize().into_bytes();
    Ok(format!("t={},v1={}", timestamp, hex::encode(signature)))
}

pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), PaymentError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| PaymentError::InvalidSignature("missing timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(PaymentError::InvalidSignature("missing v1 signature".to_string()));
    }
    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(PaymentError::InvalidSignature(
            "timestamp outside tolerance".to_string(),
        ));
    }

    for candidate in signatures {
        let Ok(bytes) = hex::decode(candidate) else {
            debug!("Skipping undecodable webhook signature");
            continue;
        };
        if mac_for(secret, timestamp, payload)?.verify_slice(&bytes).is_ok() {
            return Ok(());
        }
    }

    Err(PaymentError::InvalidSignature("no matching signature".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "whsec_test_secret";
    const PAYLOAD: &[u8] = br#"{"id":"evt_1"}"#;

    #[test]
    fn test_accepts_own_signature() {
        let header = signature_header(PAYLOAD, SECRET, 1_700_000_000).unwrap();
        assert!(verify_signature(PAYLOAD, &header, SECRET, 1_700_000_100).is_ok());
    }

    #[test]
    fn test_rejects_modified_payload_or_wrong_secret() {
        let header = signature_header(PAYLOAD, SECRET, 1_700_000_000).unwrap();

        assert_matches!(
            verify_signature(br#"{"id":"evt_2"}"#, &header, SECRET, 1_700_000_000),
            Err(PaymentError::InvalidSignature(_))
        );
        assert_matches!(
            verify_signature(PAYLOAD, &header, "whsec_other", 1_700_000_000),
            Err(PaymentError::InvalidSignature(_))
        );
    }

    #[test]
    fn test_rejects_stale_timestamp() {
        let header = signature_header(PAYLOAD, SECRET, 1_700_000_000).unwrap();
        assert_matches!(
            verify_signature(PAYLOAD, &header, SECRET, 1_700_000_000 + SIGNATURE_TOLERANCE_SECS + 1),
            Err(PaymentError::InvalidSignature(_))
        );
    }

    #[test]
    fn test_any_matching_v1_is_enough() {
        let valid = signature_header(PAYLOAD, SECRET, 1_700_000_000).unwrap();
        let v1 = valid.split_once("v1=").unwrap().1;
        let header = format!("t=1700000000,v1=deadbeef,v0=ignored,v1={}", v1);

        assert!(verify_signature(PAYLOAD, &header, SECRET, 1_700_000_000).is_ok());
    }

    #[test]
    fn test_rejects_malformed_headers() {
        for header in ["", "v1=abcd", "t=1700000000", "t=abc,v1=abcd"] {
            assert!(verify_signature(PAYLOAD, header, SECRET, 1_700_000_000).is_err());
        }
    }
}
