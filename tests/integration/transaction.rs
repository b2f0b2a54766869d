use crate::*;

use c11n_client::{BodyError, ClientError, ErrorKind, PublicKey, TransactionHash};

const CAROL: &str = "oNspPPgszVUFw0qmGFfWwh1uxVUXgvBxleXORHj07g8=";
const DAVE: &str = "R56gy4dn24YOjwyesTczYa8m5xhP6hF2uTMCju/1xkY=";

/// Send a payload through the stub and return its hash.
async fn sent_tx(h: &Harness, payload: &[u8], from: Option<&str>, to: &[&str]) -> TransactionHash {
    let from = from.map(PublicKey::from);
    let to: Vec<PublicKey> = to.iter().copied().map(PublicKey::from).collect();
    let key = h
        .client
        .send_payload(payload.to_vec(), from.as_ref(), &to)
        .await
        .unwrap();
    TransactionHash::from_slice(&key).unwrap()
}

/// A payload whose hash has `+` and `/` in its base64 form.
fn payload_with_special_hash() -> Vec<u8> {
    (0u32..)
        .map(|i| i.to_le_bytes().to_vec())
        .find(|p| {
            let b64 = TransactionHash::new(stub::digest(p)).to_base64();
            b64.contains('/') && b64.contains('+')
        })
        .unwrap()
}

#[tokio::test]
async fn test_is_sender_true_for_self_transaction() {
    let h = spawn_node().unwrap();
    let tx = sent_tx(&h, b"mine", None, &[CAROL]).await;
    assert!(h.client.is_sender(&tx).await.unwrap());
}

#[tokio::test]
async fn test_is_sender_false_for_foreign_sender() {
    let h = spawn_node().unwrap();
    let tx = sent_tx(&h, b"theirs", Some(DAVE), &[CAROL]).await;
    assert!(!h.client.is_sender(&tx).await.unwrap());
}

/// Only the exact body `true` counts; everything else is false, not an
/// error.
#[tokio::test]
async fn test_is_sender_literal_bodies() {
    let hash = TransactionHash::new([3u8; 64]);
    let cases = [
        ("true", true),
        ("false", false),
        ("", false),
        ("TRUE", false),
        ("True", false),
        ("true\n", false),
        ("1", false),
        ("yes", false),
    ];
    for (body, expected) in cases {
        let h = spawn_fixed(StatusCode::OK, body).unwrap();
        let got = h.client.is_sender(&hash).await.unwrap();
        assert_eq!(got, expected, "body {body:?}");
    }
}

#[tokio::test]
async fn test_participants_in_node_order() {
    let h = spawn_node().unwrap();
    let tx = sent_tx(&h, b"shared", None, &[DAVE, CAROL]).await;
    let participants = h.client.get_participants(&tx).await.unwrap();
    assert_eq!(participants, vec![DAVE.to_string(), CAROL.to_string()]);
}

#[tokio::test]
async fn test_participants_body_split() {
    let hash = TransactionHash::new([4u8; 64]);

    let h = spawn_fixed(StatusCode::OK, "a,b,c").unwrap();
    assert_eq!(
        h.client.get_participants(&hash).await.unwrap(),
        vec!["a", "b", "c"]
    );

    // Empty body: one empty entry, not an empty list.
    let h = spawn_fixed(StatusCode::OK, "").unwrap();
    assert_eq!(
        h.client.get_participants(&hash).await.unwrap(),
        vec![String::new()]
    );
}

/// Non-UTF-8 bytes are an error, not replacement characters.
#[tokio::test]
async fn test_participants_invalid_utf8_is_decoding_error() {
    let h = spawn_fixed_bytes(StatusCode::OK, b"QUJD,\xff\xfe").unwrap();
    let err = h
        .client
        .get_participants(&TransactionHash::new([5u8; 64]))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ClientError::Decoding(BodyError::Utf8(_))),
        "got {err}"
    );
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[tokio::test]
async fn test_participants_empty_recipient_list_from_node() {
    let h = spawn_node().unwrap();
    let tx = sent_tx(&h, b"nobody", None, &[]).await;
    assert_eq!(h.client.get_participants(&tx).await.unwrap(), vec![""]);
}

/// `+`, `/` and `=` in the base64 hash are escaped on the wire and arrive
/// intact once the node decodes the segment.
#[tokio::test]
async fn test_hash_path_segment_is_escaped() {
    let h = spawn_node().unwrap();
    let payload = payload_with_special_hash();
    let tx = sent_tx(&h, &payload, None, &[CAROL]).await;
    let b64 = tx.to_base64();

    h.client.is_sender(&tx).await.unwrap();
    let req = h.state.last_request();
    let segment = req
        .raw_path
        .strip_prefix("/transaction/")
        .and_then(|rest| rest.strip_suffix("/isSender"))
        .expect("unexpected path shape");
    assert!(!segment.contains('/'), "raw segment {segment}");
    assert!(!segment.contains('+'), "raw segment {segment}");
    assert!(!segment.contains('='), "raw segment {segment}");
    assert!(segment.contains("%2F") && segment.contains("%2B") && segment.contains("%3D"));
    assert_eq!(req.hash_param.as_deref(), Some(b64.as_str()));

    let participants = h.client.get_participants(&tx).await.unwrap();
    assert_eq!(participants, vec![CAROL]);
    let req = h.state.last_request();
    assert!(req.raw_path.ends_with("/participants"));
    assert_eq!(req.hash_param.as_deref(), Some(b64.as_str()));
}

#[tokio::test]
async fn test_unknown_transaction_is_unexpected_status() {
    let h = spawn_node().unwrap();
    let err = h
        .client
        .is_sender(&TransactionHash::new([0u8; 64]))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}
