//! # 공유 토큰 생성
//!
//! 설계를 ID 없이 읽을 수 있게 해주는 추측 불가능한 토큰을 만듭니다.
//! 21자, 알파벳 `A-Z a-z 0-9 _ -` (64개 기호)에서 뽑습니다.
//!
//! 64개 기호이므로 무작위 바이트의 하위 6비트를 그대로 인덱스로 쓰면
//! 편향 없이 균등하게 뽑힙니다. 전체 엔트로피는 126비트입니다.
//! 유일성 자체는 `designs.share_token` UNIQUE 제약이 최종 보장합니다.

use rand_core::{OsRng, RngCore};

/// 공유 토큰 길이
pub const SHARE_TOKEN_LEN: usize = 21;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// OS 난수 생성기(CSPRNG)로 새 공유 토큰을 만듭니다.
pub fn generate_share_token() -> String {
    let mut bytes = [0u8; SHARE_TOKEN_LEN];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| ALPHABET[(b & 0x3f) as usize] as char)
        .collect()
}

/// 문자열이 공유 토큰 형식인지 확인합니다.
///
/// `GET /shared/{token}`에서 DB 조회 전에 형식부터 거릅니다.
pub fn is_share_token(candidate: &str) -> bool {
    candidate.len() == SHARE_TOKEN_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
