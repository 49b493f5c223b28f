//! Tunable constants for the pipeline, mirroring the teacher's
//! `config::constant` module: one place for every magic number named by
//! the specification instead of scattering literals through the
//! algorithms.

pub mod constant {
    /// L2 cost model (spec section 4.2).
    pub(crate) const COST_PER_KM: f64 = 0.5;
    pub(crate) const COST_PER_KG: f64 = 0.1;

    /// L2 load-balancing refinement.
    pub(crate) const OVERLOADED_FACTOR: f64 = 1.15;
    pub(crate) const UNDERLOADED_FACTOR: f64 = 0.85;
    pub(crate) const BALANCE_STDDEV_FRACTION: f64 = 0.20;
    pub(crate) const BALANCE_MAX_ROUNDS: usize = 100;

    /// L3 default per-zone duration (minutes) when none is configured.
    pub(crate) const DEFAULT_DURATION_PER_POINT_MIN: i64 = 5;
    pub(crate) const DEFAULT_DURATION_FIXED_MIN: i64 = 10;

    /// L3 night-ban interval, fixed policy per spec section 3.
    pub(crate) const NIGHT_START_HOUR: u32 = 22;
    pub(crate) const NIGHT_END_HOUR: u32 = 6;

    /// L3 slot-selection penalty (spec section 4.3).
    pub(crate) const PENALTY_CONGESTION_SCALE: f64 = 100.0;
    pub(crate) const EARLY_BONUS_BEFORE_7: f64 = 50.0;
    pub(crate) const EARLY_BONUS_BEFORE_8: f64 = 20.0;
    pub(crate) const LATE_BONUS_FROM_18: f64 = 30.0;

    /// L4 2-opt / 3-opt / Or-opt improvement thresholds.
    pub(crate) const TWO_OPT_EPSILON: f64 = 1e-4;
    pub(crate) const THREE_OPT_EPSILON: f64 = 1e-4;
    pub(crate) const OR_OPT_EPSILON: f64 = 1e-3;
    pub(crate) const OR_OPT_MAX_ITER: usize = 30;
    pub(crate) const CROSSING_EPSILON: f64 = 1e-4;

    /// L4 2-opt iteration cap: min(TWO_OPT_MAX_ITER_CAP, TWO_OPT_ITER_BASE + TWO_OPT_ITER_PER_POINT * |P|).
    pub(crate) const TWO_OPT_MAX_ITER_CAP: usize = 500;
    pub(crate) const TWO_OPT_ITER_BASE: usize = 50;
    pub(crate) const TWO_OPT_ITER_PER_POINT: usize = 5;

    /// L4 3-opt iteration caps and index-window bound.
    pub(crate) const THREE_OPT_MAX_ITER_SMALL: usize = 10;
    pub(crate) const THREE_OPT_MAX_ITER_LARGE: usize = 5;
    pub(crate) const THREE_OPT_SMALL_THRESHOLD: usize = 15;
    pub(crate) const THREE_OPT_WINDOW: usize = 12;

    /// L4 simulated annealing schedule.
    pub(crate) const SA_T_INITIAL: f64 = 30.0;
    pub(crate) const SA_ALPHA: f64 = 0.995;
    pub(crate) const SA_T_MIN: f64 = 0.1;
    pub(crate) const SA_MAX_ITER_SMALL: usize = 200;
    pub(crate) const SA_MAX_ITER_LARGE: usize = 100;
    pub(crate) const SA_LARGE_THRESHOLD: usize = 20;

    /// L4 crossing-elimination pass.
    pub(crate) const CROSSING_MAX_OUTER_ITER: usize = 200;

    /// L4 degenerate-input short circuit (fewer points than this skip
    /// 2-opt/3-opt/SA entirely).
    pub(crate) const DEGENERATE_POINT_COUNT: usize = 4;
}
