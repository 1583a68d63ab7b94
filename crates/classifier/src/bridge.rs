//! 이벤트 브리지 파이프라인.
//!
//! 이벤트 버스가 보낸 [`RawFrame`]을 채널로 받아 사전 필터, 디코딩, 분류를
//! 거치고 조립된 알림을 다운스트림 채널로 내보냅니다. core의
//! [`Pipeline`](alertgate_core::pipeline::Pipeline) trait을 구현하여
//! 다른 모듈과 동일한 생명주기로 관리됩니다.
//!
//! # 내부 아키텍처
//! ```text
//! frame_sender -> mpsc -> pre_filter -> decode -> classify -> mpsc -> downstream
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use alertgate_core::metrics as m;
use alertgate_core::pipeline::{HealthStatus, Pipeline};
use alertgate_core::taxonomy;
use alertgate_core::{
    AlertgateError, NameResolver, NormalizedAlert, PipelineError, RawEvent, RawFrame,
};

use crate::config::{ClassifierConfig, DEFAULT_CHANNEL_CAPACITY};
use crate::engine::{ClassifyEngine, Verdict};
use crate::error::ClassifierError;
use crate::resolver::MapResolver;

/// 브리지 실행 상태
#[derive(Debug, Clone, PartialEq, Eq)]
enum BridgeState {
    /// 초기화됨, 아직 시작하지 않음
    Initialized,
    /// 실행 중
    Running,
    /// 정지됨
    Stopped,
}

/// 워커와 공유하는 처리 카운터
#[derive(Debug, Default)]
struct BridgeCounters {
    received: AtomicU64,
    prefiltered: AtomicU64,
    decode_errors: AtomicU64,
    accepted: AtomicU64,
    rejected: AtomicU64,
    emitted: AtomicU64,
}

/// 이벤트 브리지 -- 프레임 수신/판정/알림 송신의 전체 흐름을 관리합니다.
///
/// # 사용 예시
/// ```ignore
/// use alertgate_classifier::EventBridgeBuilder;
///
/// let (mut bridge, alert_rx) = EventBridgeBuilder::new()
///     .config(config)
///     .resolver(resolver)
///     .build()?;
/// let frame_tx = bridge.frame_sender();
///
/// bridge.start().await?;
/// frame_tx.send(frame).await?;
/// ```
pub struct EventBridge {
    /// 브리지 설정
    config: ClassifierConfig,
    /// 현재 상태
    state: BridgeState,
    /// 분류 엔진 (워커와 공유)
    engine: Arc<ClassifyEngine>,
    /// 내부 프레임 채널 송신측 (발행자에 전달)
    frame_tx: mpsc::Sender<RawFrame>,
    /// 내부 프레임 채널 수신측 (start 시 워커로 이동)
    frame_rx: Option<mpsc::Receiver<RawFrame>>,
    /// 알림 전송 채널 (브리지 -> downstream)
    alert_tx: mpsc::Sender<NormalizedAlert>,
    /// 워커 중단 토큰
    cancel: CancellationToken,
    /// 백그라운드 태스크 핸들
    tasks: Vec<tokio::task::JoinHandle<()>>,
    /// 처리 카운터 (워커와 공유)
    counters: Arc<BridgeCounters>,
}

impl EventBridge {
    /// 현재 상태를 반환합니다.
    pub fn state_name(&self) -> &str {
        match self.state {
            BridgeState::Initialized => "initialized",
            BridgeState::Running => "running",
            BridgeState::Stopped => "stopped",
        }
    }

    /// 프레임 송신측을 복제하여 반환합니다.
    ///
    /// 발행자(이벤트 버스 어댑터, CLI 재생기)가 이 송신측으로 프레임을
    /// 넣습니다. 모든 송신측이 드롭되면 워커는 채널 종료로 정지하며,
    /// 재시작 후에는 송신측을 다시 받아야 합니다.
    pub fn frame_sender(&self) -> mpsc::Sender<RawFrame> {
        self.frame_tx.clone()
    }

    /// 브리지가 쓰는 분류 엔진을 반환합니다.
    pub fn engine(&self) -> &ClassifyEngine {
        &self.engine
    }

    /// 브리지 설정을 반환합니다.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// 수신한 프레임 수를 반환합니다.
    pub fn received_count(&self) -> u64 {
        self.counters.received.load(Ordering::Relaxed)
    }

    /// 사전 필터에서 걸러진 프레임 수를 반환합니다.
    pub fn prefiltered_count(&self) -> u64 {
        self.counters.prefiltered.load(Ordering::Relaxed)
    }

    /// 디코딩에 실패한 프레임 수를 반환합니다.
    pub fn decode_error_count(&self) -> u64 {
        self.counters.decode_errors.load(Ordering::Relaxed)
    }

    /// 수락된 이벤트 수를 반환합니다.
    pub fn accepted_count(&self) -> u64 {
        self.counters.accepted.load(Ordering::Relaxed)
    }

    /// 거부된 이벤트 수를 반환합니다.
    pub fn rejected_count(&self) -> u64 {
        self.counters.rejected.load(Ordering::Relaxed)
    }

    /// 다운스트림으로 내보낸 알림 수를 반환합니다.
    pub fn emitted_count(&self) -> u64 {
        self.counters.emitted.load(Ordering::Relaxed)
    }
}

impl Pipeline for EventBridge {
    fn name(&self) -> &str {
        "event-bridge"
    }

    async fn start(&mut self) -> Result<(), AlertgateError> {
        if self.state == BridgeState::Running {
            return Err(PipelineError::AlreadyRunning.into());
        }

        tracing::info!("starting event bridge");

        // 재시작이면 프레임 채널을 새로 연다. 이전 start에서 얻은 송신측은
        // 무효가 되므로 호출자는 frame_sender()를 다시 받아야 한다.
        let frame_rx = match self.frame_rx.take() {
            Some(rx) => rx,
            None => {
                let (tx, rx) = mpsc::channel(self.config.channel_capacity);
                self.frame_tx = tx;
                rx
            }
        };
        // 중단 토큰은 한 번 취소되면 되돌릴 수 없어 start마다 새로 만든다
        self.cancel = CancellationToken::new();

        let worker = BridgeWorker {
            engine: Arc::clone(&self.engine),
            frame_rx,
            alert_tx: self.alert_tx.clone(),
            counters: Arc::clone(&self.counters),
        };
        self.tasks.push(tokio::spawn(worker.run(self.cancel.clone())));

        self.state = BridgeState::Running;
        tracing::info!("event bridge started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), AlertgateError> {
        if self.state != BridgeState::Running {
            return Err(PipelineError::NotRunning.into());
        }

        tracing::info!("stopping event bridge");

        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "bridge worker task join failed");
            }
        }

        self.state = BridgeState::Stopped;
        tracing::info!(
            received = self.received_count(),
            emitted = self.emitted_count(),
            "event bridge stopped"
        );
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        match self.state {
            BridgeState::Running => {
                if self.tasks.iter().any(|task| task.is_finished()) {
                    HealthStatus::Degraded("bridge worker exited".to_owned())
                } else {
                    HealthStatus::Healthy
                }
            }
            BridgeState::Initialized => HealthStatus::Unhealthy("not started".to_owned()),
            BridgeState::Stopped => HealthStatus::Unhealthy("stopped".to_owned()),
        }
    }
}

// ─── 워커 ───

/// 프레임 수신 루프를 도는 백그라운드 워커
struct BridgeWorker {
    engine: Arc<ClassifyEngine>,
    frame_rx: mpsc::Receiver<RawFrame>,
    alert_tx: mpsc::Sender<NormalizedAlert>,
    counters: Arc<BridgeCounters>,
}

impl BridgeWorker {
    async fn run(mut self, cancel: CancellationToken) {
        tracing::info!("bridge worker started");
        loop {
            tokio::select! {
                maybe_frame = self.frame_rx.recv() => {
                    match maybe_frame {
                        Some(frame) => {
                            if !self.process_frame(frame).await {
                                break;
                            }
                        }
                        None => {
                            tracing::info!("frame channel closed, stopping bridge worker");
                            break;
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    tracing::info!("cancellation requested, stopping bridge worker");
                    break;
                }
            }
        }
        tracing::info!("bridge worker stopped");
    }

    /// 프레임 하나를 처리합니다.
    ///
    /// 알림 채널이 닫혀 더 진행할 수 없을 때만 false를 반환합니다.
    async fn process_frame(&self, frame: RawFrame) -> bool {
        self.counters.received.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(m::EVENTS_RECEIVED_TOTAL).increment(1);

        if !self.engine.pre_filter(frame.category_id, frame.element_id) {
            self.counters.prefiltered.fetch_add(1, Ordering::Relaxed);
            metrics::counter!(
                m::EVENTS_PREFILTERED_TOTAL,
                m::LABEL_CATEGORY => category_label(frame.category_id),
                m::LABEL_ELEMENT => element_label(frame.category_id, frame.element_id)
            )
            .increment(1);
            return true;
        }

        let event = match RawEvent::decode(&frame) {
            Ok(event) => event,
            Err(err) => {
                self.counters.decode_errors.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(m::DECODE_ERRORS_TOTAL).increment(1);
                tracing::warn!(%frame, error = %err, "failed to decode frame, skipping");
                return true;
            }
        };

        let started = Instant::now();
        let verdict = self.engine.classify(&event);
        metrics::histogram!(m::CLASSIFY_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        match verdict {
            Verdict::Emit(alert) => {
                self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(m::EVENTS_ACCEPTED_TOTAL).increment(1);
                if self.alert_tx.send(alert).await.is_err() {
                    tracing::error!("alert channel closed, stopping bridge worker");
                    return false;
                }
                self.counters.emitted.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(m::ALERTS_EMITTED_TOTAL).increment(1);
            }
            Verdict::Accept => {
                self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(m::EVENTS_ACCEPTED_TOTAL).increment(1);
            }
            Verdict::Reject(reason) => {
                self.counters.rejected.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(
                    m::EVENTS_REJECTED_TOTAL,
                    m::LABEL_REASON => reason.label()
                )
                .increment(1);
            }
        }
        true
    }
}

/// 메트릭 레이블용 카테고리 표기. 미지의 ID는 숫자 그대로 씁니다.
fn category_label(category_id: u16) -> String {
    match taxonomy::Category::from_id(category_id) {
        Some(category) => category.name().to_owned(),
        None => category_id.to_string(),
    }
}

/// 메트릭 레이블용 엘리먼트 표기. 미지의 쌍은 숫자 그대로 씁니다.
fn element_label(category_id: u16, element_id: u16) -> String {
    match taxonomy::element_name(category_id, element_id) {
        Some(name) => name.to_owned(),
        None => element_id.to_string(),
    }
}

// ─── 빌더 ───

/// 이벤트 브리지 빌더
///
/// 브리지를 구성하고 필요한 채널을 생성합니다. 리졸버를 지정하지 않으면
/// 빈 [`MapResolver`]를 사용하며, 기본 설정에서는 서비스 이벤트가 전부
/// 익명으로 거부됩니다.
pub struct EventBridgeBuilder {
    config: ClassifierConfig,
    resolver: Option<Arc<dyn NameResolver>>,
    alert_tx: Option<mpsc::Sender<NormalizedAlert>>,
    alert_channel_capacity: usize,
}

impl EventBridgeBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
            resolver: None,
            alert_tx: None,
            alert_channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// 브리지 설정을 지정합니다.
    pub fn config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    /// 이름 리졸버를 지정합니다.
    pub fn resolver(mut self, resolver: Arc<dyn NameResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// 외부 알림 전송 채널을 설정합니다.
    ///
    /// 설정하지 않으면 빌더가 새 채널을 생성합니다.
    pub fn alert_sender(mut self, tx: mpsc::Sender<NormalizedAlert>) -> Self {
        self.alert_tx = Some(tx);
        self
    }

    /// 알림 채널 용량을 설정합니다 (외부 채널 미사용 시).
    pub fn alert_channel_capacity(mut self, capacity: usize) -> Self {
        self.alert_channel_capacity = capacity;
        self
    }

    /// 브리지를 빌드합니다.
    ///
    /// # Returns
    /// - `EventBridge`: 브리지 인스턴스
    /// - `Option<mpsc::Receiver<NormalizedAlert>>`: 알림 수신 채널
    ///   (외부 alert_sender를 설정한 경우 None)
    pub fn build(
        self,
    ) -> Result<(EventBridge, Option<mpsc::Receiver<NormalizedAlert>>), ClassifierError> {
        if self.alert_channel_capacity == 0 {
            return Err(ClassifierError::Config {
                field: "alert_channel_capacity".to_owned(),
                reason: "must be >= 1".to_owned(),
            });
        }

        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(MapResolver::new()));
        // ClassifyEngine::new가 설정을 검증한다
        let engine = ClassifyEngine::new(self.config.clone(), resolver)?;

        let (frame_tx, frame_rx) = mpsc::channel(self.config.channel_capacity);

        let (alert_tx, alert_rx) = if let Some(tx) = self.alert_tx {
            (tx, None)
        } else {
            let (tx, rx) = mpsc::channel(self.alert_channel_capacity);
            (tx, Some(rx))
        };

        let bridge = EventBridge {
            config: self.config,
            state: BridgeState::Initialized,
            engine: Arc::new(engine),
            frame_tx,
            frame_rx: Some(frame_rx),
            alert_tx,
            cancel: CancellationToken::new(),
            tasks: Vec::new(),
            counters: Arc::new(BridgeCounters::default()),
        };

        Ok((bridge, alert_rx))
    }
}

impl Default for EventBridgeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
