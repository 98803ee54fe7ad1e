//! Simulated annealing over a single arrangement.

use puzzleforge_config::{AnnealingConfig, ArrangementConfig};
use puzzleforge_core::{fitness, Arrangement, PuzzleForgeError, PuzzlePiece, Result, Vector3};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::trace;

use super::SearchStrategy;
use crate::factory::ArrangementFactory;
use crate::stats::SearchStats;

/// Metropolis search with geometric cooling.
///
/// A worse neighbor is accepted with probability `exp(Δ/T)`; the temperature
/// is multiplied by the cooling rate after every iteration, accepted or not.
#[derive(Debug)]
pub struct AnnealingSearch<'a> {
    factory: ArrangementFactory<'a>,
    config: AnnealingConfig,
    current: Option<(Arrangement, f64)>,
    best: Option<(Arrangement, f64)>,
    temperature: f64,
}

impl<'a> AnnealingSearch<'a> {
    pub fn new(
        pieces: &'a [PuzzlePiece],
        arrangement_config: ArrangementConfig,
        config: AnnealingConfig,
    ) -> Self {
        let temperature = config.starting_temperature;
        Self {
            factory: ArrangementFactory::new(pieces, arrangement_config),
            config,
            current: None,
            best: None,
            temperature,
        }
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn current_fitness(&self) -> Option<f64> {
        self.current.as_ref().map(|(_, f)| *f)
    }

    /// Clones `current` and perturbs one placement: either all three
    /// position components or all three rotation components.
    fn neighbor(&self, current: &Arrangement, rng: &mut StdRng) -> Arrangement {
        let mut neighbor = current.clone();
        let placements = neighbor.placements_mut();
        if placements.is_empty() {
            return neighbor;
        }
        let index = rng.random_range(0..placements.len());
        let placement = &mut placements[index];
        if rng.random_bool(0.5) {
            placement.position += offset(rng, self.config.position_step);
        } else {
            placement.rotation += offset(rng, self.config.rotation_step);
        }
        neighbor
    }
}

fn offset(rng: &mut StdRng, step: f64) -> Vector3 {
    Vector3::new(
        rng.random_range(-step..=step),
        rng.random_range(-step..=step),
        rng.random_range(-step..=step),
    )
}

fn checked_fitness(arrangement: &Arrangement) -> Result<f64> {
    let value = fitness(arrangement);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PuzzleForgeError::Compute(format!(
            "non-finite fitness {value} during annealing"
        )))
    }
}

impl SearchStrategy for AnnealingSearch<'_> {
    fn strategy_name(&self) -> &'static str {
        "simulated_annealing"
    }

    fn start(&mut self, rng: &mut StdRng, stats: &mut SearchStats) -> Result<()> {
        self.temperature = self.config.starting_temperature;
        if self.factory.piece_count() == 0 {
            return Ok(());
        }
        let initial = self.factory.random(rng);
        let score = checked_fitness(&initial)?;
        stats.record_evaluations(1);
        self.best = Some((initial.clone(), score));
        self.current = Some((initial, score));
        Ok(())
    }

    fn step(&mut self, rng: &mut StdRng, stats: &mut SearchStats) -> Result<()> {
        let Some((current, current_fitness)) = self.current.as_ref() else {
            return Ok(());
        };

        let candidate = self.neighbor(current, rng);
        let candidate_fitness = checked_fitness(&candidate)?;
        stats.record_evaluations(1);

        let delta = candidate_fitness - *current_fitness;
        let accepted = delta > 0.0 || rng.random::<f64>() < (delta / self.temperature).exp();
        stats.record_move(accepted);

        if accepted {
            let improved = self
                .best
                .as_ref()
                .map_or(true, |(_, best)| candidate_fitness > *best);
            if improved {
                trace!(
                    event = "improvement",
                    strategy = "simulated_annealing",
                    fitness = candidate_fitness,
                    temperature = self.temperature,
                );
                self.best = Some((candidate.clone(), candidate_fitness));
                stats.record_improvement();
            }
            self.current = Some((candidate, candidate_fitness));
        }

        self.temperature *= self.config.cooling_rate;
        Ok(())
    }

    fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|(_, f)| *f)
    }

    fn best(&self) -> Option<&Arrangement> {
        self.best.as_ref().map(|(a, _)| a)
    }

    fn into_best(self: Box<Self>) -> Option<Arrangement> {
        self.best.map(|(a, _)| a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzleforge_test::{arrangement_at, uniform_pieces};
    use rand::SeedableRng;

    fn search(pieces: &[PuzzlePiece]) -> AnnealingSearch<'_> {
        AnnealingSearch::new(pieces, ArrangementConfig::default(), AnnealingConfig::default())
    }

    #[test]
    fn test_temperature_schedule() {
        let pieces = uniform_pieces(4);
        let mut strategy = search(&pieces);
        let mut rng = StdRng::seed_from_u64(3);
        let mut stats = SearchStats::default();
        strategy.start(&mut rng, &mut stats).unwrap();
        assert_eq!(strategy.temperature(), 100.0);

        for _ in 0..200 {
            strategy.step(&mut rng, &mut stats).unwrap();
        }
        let expected = AnnealingConfig::default().temperature_at(200);
        assert!((strategy.temperature() - expected).abs() < 1e-9);
        assert!((expected - 100.0 * 0.995_f64.powi(200)).abs() < 1e-9);
    }

    #[test]
    fn test_single_iteration() {
        let pieces = uniform_pieces(3);
        let mut strategy = search(&pieces);
        let mut rng = StdRng::seed_from_u64(17);
        let mut stats = SearchStats::default();
        strategy.start(&mut rng, &mut stats).unwrap();
        strategy.step(&mut rng, &mut stats).unwrap();

        assert_eq!(stats.moves_evaluated, 1);
        assert_eq!(strategy.best().unwrap().len(), 3);
    }

    #[test]
    fn test_best_never_worse_than_current() {
        let pieces = uniform_pieces(5);
        let mut strategy = search(&pieces);
        let mut rng = StdRng::seed_from_u64(99);
        let mut stats = SearchStats::default();
        strategy.start(&mut rng, &mut stats).unwrap();

        let mut previous = strategy.best_fitness().unwrap();
        for _ in 0..500 {
            strategy.step(&mut rng, &mut stats).unwrap();
            let best = strategy.best_fitness().unwrap();
            assert!(best >= previous);
            assert!(best >= strategy.current_fitness().unwrap());
            previous = best;
        }
        assert_eq!(stats.moves_evaluated, 500);
        assert!(stats.moves_accepted > 0);
    }

    #[test]
    fn test_neighbor_changes_one_placement() {
        let pieces = uniform_pieces(4);
        let strategy = search(&pieces);
        let mut rng = StdRng::seed_from_u64(23);
        let base = arrangement_at(&[(0.0, 0.0, 0.0); 4]);

        for _ in 0..50 {
            let neighbor = strategy.neighbor(&base, &mut rng);
            let changed: Vec<_> = neighbor
                .iter()
                .zip(base.iter())
                .filter(|(n, b)| n != b)
                .map(|(n, _)| n)
                .collect();
            assert!(changed.len() <= 1);
            for placement in changed {
                let moved = placement.position != Vector3::ZERO;
                let turned = placement.rotation != Vector3::ZERO;
                assert!(moved != turned);
                assert!(placement.position.x.abs() <= 2.0);
                assert!(placement.rotation.x.abs() <= 45.0);
            }
        }
    }

    #[test]
    fn test_empty_pieces_no_best() {
        let pieces = uniform_pieces(0);
        let mut strategy = search(&pieces);
        let mut rng = StdRng::seed_from_u64(0);
        let mut stats = SearchStats::default();
        strategy.start(&mut rng, &mut stats).unwrap();
        strategy.step(&mut rng, &mut stats).unwrap();
        assert!(strategy.best().is_none());
    }
}
