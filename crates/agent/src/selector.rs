//! Reply selection — one chat turn from statement to logged reply.
//!
//! Every turn runs the same pipeline:
//!
//! 1. **Collect**: call each replier in load order, falling back once on error
//! 2. **Normalize**: merge everything into one `(score, text)` pool
//! 3. **Adjust**: hand the pool to the quality adjustor
//! 4. **Truncate**: re-sort, then keep the top `num_top_replies` candidates
//! 5. **Sample**: roulette-wheel draw weighted by score
//! 6. **Log**: append the `(user, bot)` pair to the conversation log
//!
//! A turn never fails for lack of a reply: an empty or all-zero pool yields
//! [`FALLBACK_REPLY`].

use std::sync::Arc;
use std::time::Duration;

use parley_config::AppConfig;
use parley_core::error::{Error, SkillError};
use parley_core::history::ConversationLog;
use parley_core::quality::QualityAdjustor;
use parley_core::reply::{Candidate, Reply, normalize, sort_candidates};
use parley_core::skill::Replier;
use parley_skills::SkillRegistry;
use tracing::{debug, error, info, warn};

use crate::quality::QualityScore;
use crate::random::{RandomSource, ThreadRandom};

/// Returned when no skill produced a usable candidate.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong. Not sure what to say...";

pub const MIN_TOP_REPLIES: usize = 1;
pub const MAX_TOP_REPLIES: usize = 10_000;

const DEFAULT_SKILL_TIMEOUT: Duration = Duration::from_secs(30);

/// Clamp a requested pool size into `[MIN_TOP_REPLIES, MAX_TOP_REPLIES]`.
pub fn clamp_top_replies(n: usize) -> usize {
    n.clamp(MIN_TOP_REPLIES, MAX_TOP_REPLIES)
}

/// Roulette-wheel pick over `pool` using a uniform `draw` in `[0, 1)`.
///
/// The first candidate whose running score total exceeds `draw * total` wins.
/// Returns `None` when the total is not a positive finite number.
pub fn pick_weighted(pool: &[Candidate], draw: f64) -> Option<&Candidate> {
    let total: f64 = pool.iter().map(|c| c.score).sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }

    let target = draw.clamp(0.0, 1.0) * total;
    let mut running = 0.0;
    for candidate in pool {
        running += candidate.score;
        if target < running {
            return Some(candidate);
        }
    }
    // Rounding can leave the target at the very top of the wheel.
    pool.iter().rev().find(|c| c.score > 0.0)
}

/// A chat session: the loaded repliers plus everything needed to turn their
/// proposals into one reply per statement.
pub struct ReplySelector {
    registry: SkillRegistry,
    adjustor: Box<dyn QualityAdjustor>,
    log: Arc<dyn ConversationLog>,
    num_top_replies: usize,
    skill_timeout: Duration,
    random: Box<dyn RandomSource>,
}

impl ReplySelector {
    /// Create a selector. `num_top_replies` is clamped into range.
    pub fn new(
        registry: SkillRegistry,
        adjustor: impl QualityAdjustor + 'static,
        log: Arc<dyn ConversationLog>,
        num_top_replies: usize,
    ) -> Self {
        let clamped = clamp_top_replies(num_top_replies);
        if clamped != num_top_replies {
            warn!(requested = num_top_replies, used = clamped, "num_top_replies out of range, clamped");
        }
        Self {
            registry,
            adjustor: Box::new(adjustor),
            log,
            num_top_replies: clamped,
            skill_timeout: DEFAULT_SKILL_TIMEOUT,
            random: Box::new(ThreadRandom),
        }
    }

    /// Build a selector with the default quality scorer and settings from config.
    pub fn from_config(config: &AppConfig, registry: SkillRegistry, log: Arc<dyn ConversationLog>) -> Self {
        Self::new(
            registry,
            QualityScore::from_config(&config.quality),
            log,
            config.num_top_replies,
        )
        .with_timeout(Duration::from_secs(config.skill_timeout_secs))
    }

    /// Set the per-replier time limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.skill_timeout = timeout;
        self
    }

    /// Replace the source of sampling draws.
    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    pub fn num_top_replies(&self) -> usize {
        self.num_top_replies
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    pub fn log(&self) -> &Arc<dyn ConversationLog> {
        &self.log
    }

    /// The adjusted, truncated pool the next reply would be drawn from.
    pub async fn candidates(&self, statement: &str) -> Vec<Candidate> {
        let pool = self.collect(statement).await;
        if pool.is_empty() {
            return pool;
        }

        let mut pool = self.adjustor.update_replies(pool, statement);
        sort_candidates(&mut pool);
        pool.truncate(self.num_top_replies);
        debug!(candidates = pool.len(), "Candidate pool ready");
        pool
    }

    /// Produce one reply to `statement` and log the exchange.
    ///
    /// Only a conversation-log failure is an error; skill failures are
    /// logged and skipped.
    pub async fn select(&mut self, statement: &str) -> Result<String, Error> {
        let pool = self.candidates(statement).await;
        let draw = self.random.draw();

        let reply = match pick_weighted(&pool, draw) {
            Some(choice) => {
                debug!(score = choice.score, draw, "Reply drawn");
                choice.text.clone()
            }
            None => {
                warn!(candidates = pool.len(), "No usable reply, using fallback");
                FALLBACK_REPLY.to_string()
            }
        };

        self.log.append(statement, &reply).await?;
        Ok(reply)
    }

    /// Call every replier and merge their proposals into one pool.
    async fn collect(&self, statement: &str) -> Vec<Candidate> {
        let mut replies = Vec::with_capacity(self.registry.len());
        for replier in self.registry.repliers() {
            if let Some(reply) = self.invoke(replier, statement).await {
                replies.push(reply);
            }
        }
        normalize(Reply::Many(replies))
    }

    /// Primary call, then one fallback attempt if the primary errors.
    async fn invoke(&self, replier: &Replier, statement: &str) -> Option<Reply> {
        let name = replier.name();
        let timeout_secs = self.skill_timeout.as_secs();

        match tokio::time::timeout(self.skill_timeout, replier.call(statement)).await {
            Ok(Ok(reply)) => return Some(reply),
            Ok(Err(e)) => {
                error!(skill = %name, statement = %statement, error = %e, "Skill failed to reply");
            }
            Err(_) => {
                let e = SkillError::Timeout { skill: name.to_string(), timeout_secs };
                warn!(error = %e, "Skill timed out, skipping");
                return None;
            }
        }

        match tokio::time::timeout(self.skill_timeout, replier.call_fallback(statement)).await {
            Ok(Ok(reply)) => {
                info!(skill = %name, "Skill replied through fallback");
                Some(reply)
            }
            Ok(Err(SkillError::NoFallback(_))) => {
                warn!(skill = %name, "Skill has no fallback, skipping");
                None
            }
            Ok(Err(e)) => {
                error!(skill = %name, error = %e, "Skill fallback failed, skipping");
                None
            }
            Err(_) => {
                warn!(skill = %name, timeout_secs, "Skill fallback timed out, skipping");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedDraw, SeededRandom};
    use async_trait::async_trait;
    use parley_core::error::HistoryError;
    use parley_core::history::TurnRecord;
    use parley_core::quality::PassThrough;
    use parley_core::skill::{Skill, SkillOptions};
    use parley_memory::InMemoryHistory;
    use parley_skills::SkillCatalog;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry_of(repliers: Vec<Replier>) -> SkillRegistry {
        let mut catalog = SkillCatalog::new();
        catalog.register("test", move |_| Ok(repliers.clone()));
        let mut registry = SkillRegistry::new(catalog);
        registry.load_skill("test", &SkillOptions::new()).unwrap();
        registry
    }

    fn fixed(name: &str, reply: Reply) -> Replier {
        Replier::function(name, move |_s: &str| Ok(reply.clone()))
    }

    fn failing(name: &str) -> Replier {
        let skill = name.to_string();
        Replier::function(name, move |_s: &str| {
            Err(SkillError::ReplyFailed { skill: skill.clone(), reason: "boom".into() })
        })
    }

    fn selector(repliers: Vec<Replier>, top: usize) -> (ReplySelector, InMemoryHistory) {
        let history = InMemoryHistory::new();
        let selector = ReplySelector::new(registry_of(repliers), PassThrough, Arc::new(history.clone()), top);
        (selector, history)
    }

    struct Recovering;

    #[async_trait]
    impl Skill for Recovering {
        fn name(&self) -> &str {
            "recovering"
        }

        async fn reply(&self, _statement: &str) -> Result<Reply, SkillError> {
            Err(SkillError::ReplyFailed { skill: "recovering".into(), reason: "wrong arity".into() })
        }

        async fn reply_fallback(&self, _statement: &str) -> Result<Reply, SkillError> {
            Ok(Reply::scored(0.7, "recovered"))
        }
    }

    struct Stuck;

    #[async_trait]
    impl Skill for Stuck {
        fn name(&self) -> &str {
            "stuck"
        }

        async fn reply(&self, _statement: &str) -> Result<Reply, SkillError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Reply::from("too late"))
        }
    }

    struct Zeroing;

    impl QualityAdjustor for Zeroing {
        fn update_replies(&self, pool: Vec<Candidate>, _statement: &str) -> Vec<Candidate> {
            pool.into_iter().map(|c| Candidate::new(0.0, c.text)).collect()
        }
    }

    struct Inverting;

    impl QualityAdjustor for Inverting {
        fn update_replies(&self, pool: Vec<Candidate>, _statement: &str) -> Vec<Candidate> {
            pool.into_iter().map(|c| Candidate::new(1.0 - c.score, c.text)).collect()
        }
    }

    struct BrokenLog;

    #[async_trait]
    impl ConversationLog for BrokenLog {
        fn name(&self) -> &str {
            "broken"
        }

        async fn append(&self, _statement: &str, _reply: &str) -> Result<(), HistoryError> {
            Err(HistoryError::Write { path: "/nowhere".into(), reason: "read-only".into() })
        }

        async fn history(&self) -> Result<Vec<TurnRecord>, HistoryError> {
            Ok(Vec::new())
        }
    }

    fn five_candidates() -> Reply {
        Reply::Many(vec![
            Reply::scored(0.9, "a"),
            Reply::scored(0.8, "b"),
            Reply::scored(0.5, "c"),
            Reply::scored(0.3, "d"),
            Reply::scored(0.1, "e"),
        ])
    }

    #[test]
    fn clamps_pool_size() {
        assert_eq!(clamp_top_replies(0), 1);
        assert_eq!(clamp_top_replies(10), 10);
        assert_eq!(clamp_top_replies(20_000), 10_000);

        let (sel, _) = selector(vec![], 0);
        assert_eq!(sel.num_top_replies(), 1);
    }

    #[test]
    fn pick_weighted_walks_the_wheel() {
        let pool = vec![Candidate::new(0.9, "a"), Candidate::new(0.1, "b")];
        assert_eq!(pick_weighted(&pool, 0.0).unwrap().text, "a");
        assert_eq!(pick_weighted(&pool, 0.89).unwrap().text, "a");
        assert_eq!(pick_weighted(&pool, 0.91).unwrap().text, "b");
        assert_eq!(pick_weighted(&pool, 0.999_999).unwrap().text, "b");
    }

    #[test]
    fn pick_weighted_rejects_dead_pools() {
        assert!(pick_weighted(&[], 0.5).is_none());
        assert!(pick_weighted(&[Candidate::new(0.0, "x")], 0.5).is_none());
        assert!(pick_weighted(&[Candidate::new(f64::INFINITY, "x")], 0.5).is_none());
    }

    #[test]
    fn pick_weighted_skips_zero_scores() {
        let pool = vec![Candidate::new(0.0, "never"), Candidate::new(0.4, "always")];
        assert_eq!(pick_weighted(&pool, 0.0).unwrap().text, "always");
    }

    #[test]
    fn sampling_follows_scores() {
        let pool = vec![Candidate::new(0.9, "A"), Candidate::new(0.1, "B")];
        let mut random = ThreadRandom;
        let trials = 20_000;
        let hits = (0..trials)
            .filter(|_| pick_weighted(&pool, random.draw()).unwrap().text == "A")
            .count();
        let fraction = hits as f64 / trials as f64;
        assert!((0.87..0.93).contains(&fraction), "fraction of A was {fraction}");
    }

    #[tokio::test]
    async fn all_failures_give_fallback_and_one_log_pair() {
        let (mut sel, history) = selector(vec![failing("x"), failing("y")], 10);
        let reply = sel.select("Hello?").await.unwrap();
        assert_eq!(reply, FALLBACK_REPLY);
        assert_eq!(
            history.history().await.unwrap(),
            vec![TurnRecord::user("Hello?"), TurnRecord::bot(FALLBACK_REPLY)]
        );
    }

    #[tokio::test]
    async fn scored_reply_beats_unscored_echo() {
        let repliers = vec![fixed("pattern", Reply::scored(0.5, "Hello!")), fixed("echo", Reply::from("Hi"))];
        let (sel, history) = selector(repliers, 1);
        let mut sel = sel.with_random(FixedDraw(0.0));

        assert_eq!(sel.candidates("Hi").await, vec![Candidate::new(0.5, "Hello!")]);
        assert_eq!(sel.select("Hi").await.unwrap(), "Hello!");
        assert_eq!(history.len().await, 2);
    }

    #[tokio::test]
    async fn failing_replier_does_not_spoil_others() {
        let repliers = vec![failing("bad"), fixed("good", Reply::scored(0.4, "fine"))];
        let (mut sel, _) = selector(repliers, 10);
        assert_eq!(sel.select("anything").await.unwrap(), "fine");
    }

    #[tokio::test]
    async fn only_top_candidates_are_drawn() {
        let (sel, _) = selector(vec![fixed("five", five_candidates())], 2);
        let texts: Vec<String> = sel.candidates("q").await.into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["a", "b"]);

        let mut sel = sel.with_random(SeededRandom::new(1));
        for _ in 0..300 {
            let reply = sel.select("q").await.unwrap();
            assert!(reply == "a" || reply == "b", "unexpected reply {reply}");
        }
    }

    #[tokio::test]
    async fn truncation_happens_after_adjustment() {
        let history = InMemoryHistory::new();
        let sel = ReplySelector::new(
            registry_of(vec![fixed("five", five_candidates())]),
            Inverting,
            Arc::new(history),
            2,
        );
        let texts: Vec<String> = sel.candidates("q").await.into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["e", "d"]);
    }

    #[tokio::test]
    async fn fallback_convention_is_tried() {
        let (mut sel, _) = selector(vec![Replier::component(Recovering)], 10);
        assert_eq!(sel.select("hi").await.unwrap(), "recovered");
    }

    #[tokio::test]
    async fn primary_is_called_once_and_functions_have_no_fallback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let replier = Replier::function("counted", move |_s: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(SkillError::ReplyFailed { skill: "counted".into(), reason: "no".into() })
        });
        let (mut sel, _) = selector(vec![replier], 10);
        assert_eq!(sel.select("hi").await.unwrap(), FALLBACK_REPLY);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stuck_replier_times_out() {
        let repliers = vec![Replier::component(Stuck), fixed("quick", Reply::scored(0.3, "on time"))];
        let (sel, _) = selector(repliers, 10);
        let mut sel = sel.with_timeout(Duration::from_millis(50));
        assert_eq!(sel.select("hi").await.unwrap(), "on time");
    }

    #[tokio::test]
    async fn zeroed_pool_gives_fallback() {
        let history = InMemoryHistory::new();
        let mut sel = ReplySelector::new(
            registry_of(vec![fixed("one", Reply::scored(0.8, "zeroed"))]),
            Zeroing,
            Arc::new(history),
            10,
        );
        assert_eq!(sel.select("hi").await.unwrap(), FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn empty_registry_gives_fallback() {
        let history = InMemoryHistory::new();
        let mut sel = ReplySelector::new(
            SkillRegistry::new(SkillCatalog::new()),
            PassThrough,
            Arc::new(history.clone()),
            10,
        );
        assert_eq!(sel.select("").await.unwrap(), FALLBACK_REPLY);
        assert_eq!(history.len().await, 2);
    }

    #[tokio::test]
    async fn log_failure_is_an_error() {
        let mut sel = ReplySelector::new(
            registry_of(vec![fixed("one", Reply::from("x"))]),
            PassThrough,
            Arc::new(BrokenLog),
            10,
        );
        let err = sel.select("hi").await.unwrap_err();
        assert!(matches!(err, Error::History(HistoryError::Write { .. })));
    }

    #[tokio::test]
    async fn from_config_uses_settings() {
        let config = AppConfig { num_top_replies: 3, ..AppConfig::default() };
        let sel = ReplySelector::from_config(&config, registry_of(vec![]), Arc::new(InMemoryHistory::new()));
        assert_eq!(sel.num_top_replies(), 3);
        assert_eq!(sel.skill_timeout, Duration::from_secs(30));
    }
}
