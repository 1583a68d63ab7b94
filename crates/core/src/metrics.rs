//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `alertgate_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(alertgate_core::metrics::EVENTS_ACCEPTED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 카테고리 레이블 키 (neb, storage, bam 등)
pub const LABEL_CATEGORY: &str = "category";

/// 엘리먼트 레이블 키 (host_status, service_status 등)
pub const LABEL_ELEMENT: &str = "element";

/// 거부 사유 레이블 키
pub const LABEL_REASON: &str = "reason";

// ─── 이벤트 브리지 메트릭 ───────────────────────────────────────────

/// 수신한 전체 이벤트 프레임 수 (counter)
pub const EVENTS_RECEIVED_TOTAL: &str = "alertgate_events_received_total";

/// 사전 필터에서 탈락한 이벤트 수 (counter, labels: category, element)
pub const EVENTS_PREFILTERED_TOTAL: &str = "alertgate_events_prefiltered_total";

/// 판정을 통과한 이벤트 수 (counter, labels: category, element)
pub const EVENTS_ACCEPTED_TOTAL: &str = "alertgate_events_accepted_total";

/// 판정에서 거부된 이벤트 수 (counter, labels: category, element, reason)
pub const EVENTS_REJECTED_TOTAL: &str = "alertgate_events_rejected_total";

/// 페이로드 디코딩 실패 수 (counter, labels: category, element)
pub const DECODE_ERRORS_TOTAL: &str = "alertgate_decode_errors_total";

/// 다운스트림으로 전달된 정규화 알림 수 (counter)
pub const ALERTS_EMITTED_TOTAL: &str = "alertgate_alerts_emitted_total";

/// 이벤트 한 건의 분류 소요 시간 (histogram, 초)
pub const CLASSIFY_DURATION_SECONDS: &str = "alertgate_classify_duration_seconds";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 분류 소요 시간 히스토그램 버킷 (초)
///
/// 1us ~ 100ms 범위, 로그 단위 분포 (순수 인메모리 판정)
pub const CLASSIFY_DURATION_BUCKETS: [f64; 8] = [
    0.000001, 0.000005, 0.00001, 0.00005, 0.0001, 0.001, 0.01, 0.1,
];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// `metrics::describe_counter!()`, `describe_histogram!()`을 호출하여
/// HELP 텍스트를 설정합니다.
///
/// 이 함수는 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        EVENTS_RECEIVED_TOTAL,
        "Total number of raw event frames received from the event bus"
    );
    describe_counter!(
        EVENTS_PREFILTERED_TOTAL,
        "Total number of frames rejected by the pre-decode filter"
    );
    describe_counter!(
        EVENTS_ACCEPTED_TOTAL,
        "Total number of events accepted by the classification rules"
    );
    describe_counter!(
        EVENTS_REJECTED_TOTAL,
        "Total number of events rejected by the classification rules"
    );
    describe_counter!(
        DECODE_ERRORS_TOTAL,
        "Total number of event payloads that failed to decode"
    );
    describe_counter!(
        ALERTS_EMITTED_TOTAL,
        "Total number of normalized alerts forwarded downstream"
    );
    describe_histogram!(
        CLASSIFY_DURATION_SECONDS,
        "Time to classify a single event in seconds"
    );
}
