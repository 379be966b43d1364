use crate::config::{PackerConfig, SortStrategy};
use crate::error::{GatePackError, Result};
use crate::model::{BoundingBox, Gate, Layout, Placement};
use crate::packer::{Packer, frontier::FrontierPacker};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Lifecycle of a single packing run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PackState {
    /// Gates ordered, frontier seeded, nothing placed yet.
    Initialized,
    Placing,
    /// Every gate placed; the layout is final.
    Success,
    /// A gate had no valid position. No partial layout is usable.
    Failed,
}

/// One packing run with a fixed ordering, stepped one gate at a time.
///
/// The bounding box starts at the first gate's dimensions in *input* order
/// (before sorting). That seed only influences which early placements count as
/// fitting inside the box; it is not a guarantee about the final size.
#[derive(Debug, Clone)]
pub struct PackingEngine {
    strategy: SortStrategy,
    gates: Vec<Gate>,
    next: usize,
    packer: FrontierPacker,
    placements: Vec<Placement>,
    state: PackState,
}

impl PackingEngine {
    pub fn new(gates: Vec<Gate>, strategy: SortStrategy) -> Result<Self> {
        Self::with_options(gates, strategy, false)
    }

    /// Like [`PackingEngine::new`], optionally suppressing repeated candidate points.
    pub fn with_options(
        mut gates: Vec<Gate>,
        strategy: SortStrategy,
        dedup_candidates: bool,
    ) -> Result<Self> {
        validate_gates(&gates)?;
        let seed = gates
            .first()
            .map(|g| BoundingBox::new(g.width, g.height))
            .unwrap_or_default();
        // stable: equal keys keep input order
        gates.sort_by(|a, b| strategy.key(b).cmp(&strategy.key(a)));
        Ok(Self {
            strategy,
            placements: Vec::with_capacity(gates.len()),
            gates,
            next: 0,
            packer: FrontierPacker::new(seed, dedup_candidates),
            state: PackState::Initialized,
        })
    }

    pub fn state(&self) -> PackState {
        self.state
    }

    pub fn strategy(&self) -> SortStrategy {
        self.strategy
    }

    /// Gates in placement order.
    pub fn ordered_gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.packer.bounding_box()
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Current candidate frontier.
    pub fn candidates(&self) -> &[(u32, u32)] {
        self.packer.candidates()
    }

    /// Places the next gate.
    ///
    /// Returns `Ok(None)` once every gate is placed. The first gate without a
    /// valid position moves the run to [`PackState::Failed`] and every later
    /// call returns the same error.
    pub fn place_next(&mut self) -> Result<Option<&Placement>> {
        match self.state {
            PackState::Success => return Ok(None),
            PackState::Failed => return Err(self.exhausted()),
            PackState::Initialized | PackState::Placing => {}
        }
        let Some(gate) = self.gates.get(self.next) else {
            self.state = PackState::Success;
            return Ok(None);
        };
        match self.packer.pack(&gate.name, gate.width, gate.height) {
            Some(placement) => {
                self.placements.push(placement);
                self.next += 1;
                self.state = if self.next == self.gates.len() {
                    PackState::Success
                } else {
                    PackState::Placing
                };
                Ok(self.placements.last())
            }
            None => {
                self.state = PackState::Failed;
                Err(self.exhausted())
            }
        }
    }

    /// Drives the run to a terminal state.
    pub fn run(mut self) -> Result<Layout> {
        while self.place_next()?.is_some() {}
        Ok(self.finish())
    }

    /// The finished layout, available only after [`PackState::Success`].
    pub fn layout(&self) -> Option<Layout> {
        (self.state == PackState::Success).then(|| Layout {
            strategy: Some(self.strategy),
            bounding_box: self.packer.bounding_box(),
            placements: self.placements.clone(),
        })
    }

    fn finish(self) -> Layout {
        Layout {
            strategy: Some(self.strategy),
            bounding_box: self.packer.bounding_box(),
            placements: self.placements,
        }
    }

    fn exhausted(&self) -> GatePackError {
        GatePackError::PlacementExhausted {
            gate: self
                .gates
                .get(self.next)
                .map(|g| g.name.clone())
                .unwrap_or_default(),
            placed: self.placements.len(),
            total: self.gates.len(),
        }
    }
}

/// Rejects gates with a zero side, or sets whose summed sides would not fit in `u32`.
///
/// Every coordinate the frontier can produce is bounded by the summed widths
/// (or heights) of the gates placed before it.
pub fn validate_gates(gates: &[Gate]) -> Result<()> {
    let mut total_w = 0u64;
    let mut total_h = 0u64;
    for g in gates {
        if g.width == 0 || g.height == 0 {
            return Err(GatePackError::InvalidInput(format!(
                "gate '{}' has a zero dimension ({}x{})",
                g.name, g.width, g.height
            )));
        }
        total_w += g.width as u64;
        total_h += g.height as u64;
    }
    if total_w > u32::MAX as u64 || total_h > u32::MAX as u64 {
        return Err(GatePackError::InvalidInput(format!(
            "summed gate extents {}x{} exceed the coordinate range",
            total_w, total_h
        )));
    }
    Ok(())
}

#[instrument(skip_all)]
/// Packs `gates` per `cfg` and returns the finished layout.
///
/// Notes:
/// - Sorting is stable for deterministic results.
/// - With `Strategy::Auto` every ordering is tried and the densest layout wins
///   (earlier orderings win ties).
/// - An empty input succeeds with a `0x0` bounding box.
pub fn pack_gates(gates: Vec<Gate>, cfg: PackerConfig) -> Result<Layout> {
    cfg.validate()?;
    validate_gates(&gates)?;

    let candidates = cfg.strategy.candidates();
    if let [strategy] = candidates.as_slice() {
        return pack_with_strategy(gates, *strategy, cfg.dedup_candidates);
    }
    pack_portfolio(&gates, &candidates, &cfg)
}

/// Runs a single ordering to completion.
pub fn pack_with_strategy(
    gates: Vec<Gate>,
    strategy: SortStrategy,
    dedup_candidates: bool,
) -> Result<Layout> {
    let start = Instant::now();
    let n = gates.len();
    let layout = PackingEngine::with_options(gates, strategy, dedup_candidates)?.run()?;
    debug!(
        strategy = strategy.as_str(),
        gates = n,
        width = layout.bounding_box.width,
        height = layout.bounding_box.height,
        efficiency = layout.efficiency(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "packing run finished"
    );
    Ok(layout)
}

fn pack_portfolio(
    gates: &[Gate],
    candidates: &[SortStrategy],
    cfg: &PackerConfig,
) -> Result<Layout> {
    // Parallel path (optional); each candidate owns its engine.
    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            let results: Vec<Result<Layout>> = candidates
                .par_iter()
                .map(|s| pack_with_strategy(gates.to_vec(), *s, cfg.dedup_candidates))
                .collect();
            return select_best(results);
        }
    }

    let results: Vec<Result<Layout>> = candidates
        .iter()
        .map(|s| pack_with_strategy(gates.to_vec(), *s, cfg.dedup_candidates))
        .collect();
    select_best(results)
}

/// Highest efficiency wins; the earlier candidate wins ties. If nothing
/// succeeded, the first candidate's error is returned.
fn select_best(results: Vec<Result<Layout>>) -> Result<Layout> {
    let mut best: Option<Layout> = None;
    let mut first_err: Option<GatePackError> = None;
    for r in results {
        match r {
            Ok(layout) => match &best {
                Some(b) if b.efficiency() >= layout.efficiency() => {}
                _ => best = Some(layout),
            },
            Err(e) => {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }
    match (best, first_err) {
        (Some(layout), _) => {
            debug!(
                strategy = layout.strategy.map(|s| s.as_str()),
                efficiency = layout.efficiency(),
                "portfolio selected layout"
            );
            Ok(layout)
        }
        (None, Some(e)) => Err(e),
        (None, None) => Err(GatePackError::InvalidConfig(
            "no packing strategy to evaluate".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_frontier_moves_run_to_failed() {
        let gates = vec![Gate::new("a", 2, 2), Gate::new("b", 1, 1)];
        let mut engine = PackingEngine::new(gates, SortStrategy::AreaPerimeter).unwrap();
        engine.place_next().unwrap();
        assert_eq!(engine.state(), PackState::Placing);

        engine.packer.clear_candidates();
        let err = engine.place_next().unwrap_err();
        match err {
            GatePackError::PlacementExhausted {
                gate,
                placed,
                total,
            } => {
                assert_eq!(gate, "b");
                assert_eq!(placed, 1);
                assert_eq!(total, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(engine.state(), PackState::Failed);
        assert!(engine.place_next().is_err());
        assert!(engine.layout().is_none());
    }

    #[test]
    fn select_best_prefers_earlier_on_tie() {
        let a = Layout {
            strategy: Some(SortStrategy::AreaPerimeter),
            bounding_box: BoundingBox::new(2, 2),
            placements: vec![Placement {
                name: "g".into(),
                x: 0,
                y: 0,
                width: 2,
                height: 2,
            }],
        };
        let mut b = a.clone();
        b.strategy = Some(SortStrategy::Perimeter);
        let best = select_best(vec![Ok(a), Ok(b)]).unwrap();
        assert_eq!(best.strategy, Some(SortStrategy::AreaPerimeter));
    }
}
