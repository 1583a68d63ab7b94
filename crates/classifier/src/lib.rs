#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`accept`]: 카테고리 분기와 수락/거부 술어
//! - [`severity`]: 상태 코드를 알림 심각도로 바꾸는 고정 테이블
//! - [`engine`]: 사전 필터 + 분류 + 알림 조립을 묶은 동기 엔진
//! - [`bridge`]: 채널 기반 비동기 브리지 파이프라인 (Pipeline trait 구현)
//! - [`resolver`]: 인메모리 이름 리졸버 (CLI 재생과 테스트용)
//! - [`config`]: 분류기 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! RawFrame -> pre_filter -> decode -> evaluate -> assemble -> NormalizedAlert
//!                |                       |            |
//!          taxonomy match         accept rules   severity map
//! ```

pub mod accept;
pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod severity;

// --- 주요 타입 re-export ---

// 엔진
pub use engine::{ClassifyEngine, Verdict};

// 브리지
pub use bridge::{EventBridge, EventBridgeBuilder};

// 설정
pub use config::{ClassifierConfig, ClassifierConfigBuilder};

// 에러
pub use error::ClassifierError;

// 판정
pub use accept::{Decision, RejectReason, evaluate};

// 심각도
pub use severity::map_severity;

// 리졸버
pub use resolver::MapResolver;
