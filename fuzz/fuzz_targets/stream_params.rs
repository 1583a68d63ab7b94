#![no_main]

use alertgate_classifier::ClassifierConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|params: Vec<(String, String)>| {
    // 파라미터 경로는 어떤 키-값 입력에도 실패하지 않고 설정을 돌려줘야 한다
    let config = ClassifierConfig::from_params(&params);

    // 만들어진 설정은 검증도 패닉 없이 Ok 또는 Err로 끝나야 한다
    let _ = config.validate();
});
