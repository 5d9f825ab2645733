//! taskpulse-core: deterministic task scoring and the smart queue.
//!
//! Everything here is a pure function of a task snapshot and an explicit `now`.

pub mod ai_score;
pub mod analytics;
pub mod ranker;
pub mod record;
pub mod schedule;
pub mod scorer;
pub mod task;
pub mod time;

pub use ai_score::{AI_SCORE_CAP, AiScoreEstimator, AiScoreReport};
pub use analytics::{
    DailyTrend, Insights, MemberPerformance, Prioritization, Productivity, TaskAnalytics,
    Workload,
};
pub use ranker::{DEFAULT_QUEUE_BOUND, QueueStats, RankedTask, SmartQueue, TaskRanker, rank};
pub use record::{Ingested, RecordError, TaskRecord, ingest_records};
pub use schedule::{DEFAULT_SCHEDULE_BOUND, PredictiveTask, optimal_schedule};
pub use scorer::{MAX_SCORE, PriorityScorer, SCORE_BOUND, ScoreBreakdown, ScoringPolicy, score};
pub use task::{DEFAULT_BASE_QUALITY, Priority, Task, TaskStatus};
