#![no_main]

use alertgate_core::config::AlertgateConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // TOML 파서는 &str을 받으므로 UTF-8 변환 필요
    if let Ok(toml_str) = std::str::from_utf8(data) {
        if let Ok(config) = AlertgateConfig::parse(toml_str) {
            // 파싱에 성공한 설정은 검증도 패닉 없이 끝나야 한다
            let _ = config.validate();
        }
    }
});
