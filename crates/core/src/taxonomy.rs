//! 이벤트 분류 체계 — 카테고리/엘리먼트 와이어 ID 테이블
//!
//! 모니터링 엔진이 발행하는 이벤트는 (category, element) 숫자 쌍으로
//! 식별됩니다. 이 모듈은 닫힌 상수 테이블과 이름↔ID 조회, 수락 판정
//! 헬퍼를 제공합니다.
//!
//! 알 수 없는 ID는 에러가 아니라 수락 실패(false)로 처리합니다.
//! 업스트림이 이 엔진이 모르는 엘리먼트를 발행해도 중단 없이
//! 무시할 수 있어야 합니다 (전방 호환).

use std::fmt;

use serde::{Deserialize, Serialize};

/// 이벤트 카테고리
///
/// 와이어 ID는 불변이며 분류 체계 버전 내에서 전역 고유합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// 모니터링 코어 이벤트 (호스트/서비스 상태 등)
    Neb,
    /// 프로토콜 내부 이벤트
    Bbdo,
    /// 메트릭/스토리지 이벤트
    Storage,
    /// 상관관계 이벤트
    Correlation,
    /// 덤프 이벤트
    Dumper,
    /// 비즈니스 활동 모니터링 이벤트
    Bam,
    /// 외부 명령 이벤트
    Extcmd,
}

/// neb 카테고리 주요 엘리먼트 와이어 ID
pub mod neb {
    pub const ACKNOWLEDGEMENT: u16 = 1;
    pub const DOWNTIME: u16 = 5;
    pub const HOST: u16 = 12;
    pub const HOST_STATUS: u16 = 14;
    pub const LOG_ENTRY: u16 = 17;
    pub const SERVICE: u16 = 23;
    pub const SERVICE_STATUS: u16 = 24;
}

/// storage 카테고리 주요 엘리먼트 와이어 ID
pub mod storage {
    pub const METRIC: u16 = 1;
    pub const STATUS: u16 = 4;
}

/// bam 카테고리 주요 엘리먼트 와이어 ID
pub mod bam {
    pub const BA_STATUS: u16 = 1;
    pub const KPI_STATUS: u16 = 2;
}

static NEB_ELEMENTS: &[(&str, u16)] = &[
    ("acknowledgement", 1),
    ("comment", 2),
    ("custom_variable", 3),
    ("custom_variable_status", 4),
    ("downtime", 5),
    ("event_handler", 6),
    ("flapping_status", 7),
    ("host_check", 8),
    ("host_dependency", 9),
    ("host_group", 10),
    ("host_group_member", 11),
    ("host", 12),
    ("host_parent", 13),
    ("host_status", 14),
    ("instance", 15),
    ("instance_status", 16),
    ("log_entry", 17),
    ("module", 18),
    ("service_check", 19),
    ("service_dependency", 20),
    ("service_group", 21),
    ("service_group_member", 22),
    ("service", 23),
    ("service_status", 24),
    ("instance_configuration", 25),
];

static STORAGE_ELEMENTS: &[(&str, u16)] = &[
    ("metric", 1),
    ("rebuild", 2),
    ("remove_graph", 3),
    ("status", 4),
    ("index_mapping", 5),
    ("metric_mapping", 6),
];

static BAM_ELEMENTS: &[(&str, u16)] = &[
    ("ba_status", 1),
    ("kpi_status", 2),
    ("meta_service_status", 3),
    ("ba_event", 4),
    ("kpi_event", 5),
    ("ba_duration_event", 6),
    ("dimension_ba_event", 7),
    ("dimension_kpi_event", 8),
    ("dimension_ba_bv_relation_event", 9),
    ("dimension_bv_event", 10),
    ("dimension_truncate_table_signal", 11),
    ("rebuild", 12),
    ("dimension_timeperiod", 13),
    ("dimension_ba_timeperiod_relation", 14),
    ("dimension_timeperiod_exception", 15),
    ("dimension_timeperiod_exclusion", 16),
    ("inherited_downtime", 17),
];

impl Category {
    /// 닫힌 카테고리 전체 목록 (와이어 ID 순)
    pub const ALL: [Category; 7] = [
        Category::Neb,
        Category::Bbdo,
        Category::Storage,
        Category::Correlation,
        Category::Dumper,
        Category::Bam,
        Category::Extcmd,
    ];

    /// 와이어 ID를 반환합니다.
    pub fn id(&self) -> u16 {
        match self {
            Self::Neb => 1,
            Self::Bbdo => 2,
            Self::Storage => 3,
            Self::Correlation => 4,
            Self::Dumper => 5,
            Self::Bam => 6,
            Self::Extcmd => 7,
        }
    }

    /// 설정에서 쓰이는 카테고리 이름을 반환합니다.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Neb => "neb",
            Self::Bbdo => "bbdo",
            Self::Storage => "storage",
            Self::Correlation => "correlation",
            Self::Dumper => "dumper",
            Self::Bam => "bam",
            Self::Extcmd => "extcmd",
        }
    }

    /// 와이어 ID에서 카테고리를 복원합니다.
    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// 이름에서 카테고리를 찾습니다. 대소문자를 구분하지 않습니다.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    /// 카테고리별 (엘리먼트 이름, 와이어 ID) 테이블
    ///
    /// 엘리먼트 테이블이 정의되지 않은 카테고리는 빈 슬라이스를 반환하며,
    /// 그 카테고리의 엘리먼트는 이름으로 수락될 수 없습니다.
    pub fn elements(&self) -> &'static [(&'static str, u16)] {
        match self {
            Self::Neb => NEB_ELEMENTS,
            Self::Storage => STORAGE_ELEMENTS,
            Self::Bam => BAM_ELEMENTS,
            Self::Bbdo | Self::Correlation | Self::Dumper | Self::Extcmd => &[],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 이름으로 카테고리 와이어 ID를 조회합니다.
pub fn category_id(name: &str) -> Option<u16> {
    Category::from_name(name).map(|c| c.id())
}

/// 카테고리 내 이름으로 엘리먼트 와이어 ID를 조회합니다.
pub fn element_id(category_id: u16, name: &str) -> Option<u16> {
    let category = Category::from_id(category_id)?;
    let trimmed = name.trim();
    category
        .elements()
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(trimmed))
        .map(|(_, id)| *id)
}

/// (category, element) 쌍의 엘리먼트 이름을 조회합니다.
pub fn element_name(category_id: u16, element_id: u16) -> Option<&'static str> {
    let category = Category::from_id(category_id)?;
    category
        .elements()
        .iter()
        .find(|(_, id)| *id == element_id)
        .map(|(n, _)| *n)
}

/// 카테고리가 수락 목록에 포함되는지 판정합니다.
///
/// 알 수 없는 `category_id`는 false입니다.
pub fn category_accepted(accepted: &[String], category_id: u16) -> bool {
    match Category::from_id(category_id) {
        Some(category) => accepted
            .iter()
            .any(|name| category.name().eq_ignore_ascii_case(name.trim())),
        None => false,
    }
}

/// (category, element) 쌍이 설정된 엘리먼트 이름과 일치하는지 판정합니다.
///
/// 알 수 없는 쌍은 false입니다.
pub fn element_accepted(element_type: &str, category_id: u16, element_id: u16) -> bool {
    match element_name(category_id, element_id) {
        Some(name) => name.eq_ignore_ascii_case(element_type.trim()),
        None => false,
    }
}
