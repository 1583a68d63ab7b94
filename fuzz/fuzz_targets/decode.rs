#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use alertgate_core::RawEvent;

/// 퍼저용 프레임 입력
#[derive(Arbitrary, Debug)]
struct FuzzFrame {
    category_id: u16,
    element_id: u16,
    payload: Vec<u8>,
}

fuzz_target!(|input: FuzzFrame| {
    // 어떤 (카테고리, 엘리먼트, 페이로드) 조합에도 크래시나 패닉 없이
    // Ok 또는 Err을 반환해야 한다
    let _ = RawEvent::decode_parts(input.category_id, input.element_id, &input.payload);
});
