//! Genetic search with elitism and tournament selection.

use std::fmt;

use puzzleforge_config::{ArrangementConfig, GeneticConfig};
use puzzleforge_core::{fitness, Arrangement, Placement, PuzzleForgeError, PuzzlePiece, Result, Vector3};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::Rng;
use rayon::prelude::*;
use tracing::trace;

use super::SearchStrategy;
use crate::factory::ArrangementFactory;
use crate::stats::SearchStats;

/// Evolves a fixed-size population of arrangements.
///
/// Each step evaluates the current generation in parallel, updates the
/// global best, then breeds the next generation: the top
/// `population / elite_divisor` individuals carry over unchanged and the rest
/// are children of tournament-selected parents.
pub struct GeneticSearch<'a> {
    factory: ArrangementFactory<'a>,
    config: GeneticConfig,
    population: Vec<Arrangement>,
    best: Option<(Arrangement, f64)>,
}

impl<'a> GeneticSearch<'a> {
    pub fn new(
        pieces: &'a [PuzzlePiece],
        arrangement_config: ArrangementConfig,
        config: GeneticConfig,
    ) -> Self {
        Self {
            factory: ArrangementFactory::new(pieces, arrangement_config),
            config,
            population: Vec::new(),
            best: None,
        }
    }

    pub fn population(&self) -> &[Arrangement] {
        &self.population
    }

    fn population_size(&self) -> usize {
        self.config.population_size(self.factory.piece_count())
    }

    fn evaluate(&self) -> Result<Vec<f64>> {
        let scores: Vec<f64> = self.population.par_iter().map(fitness).collect();
        if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
            return Err(PuzzleForgeError::Compute(format!(
                "non-finite fitness {bad} in genetic population"
            )));
        }
        Ok(scores)
    }

    fn tournament(&self, scores: &[f64], rng: &mut StdRng) -> usize {
        let size = self.config.tournament_size.min(scores.len());
        index::sample(rng, scores.len(), size)
            .into_iter()
            .max_by(|&a, &b| scores[a].total_cmp(&scores[b]))
            .unwrap_or(0)
    }

    fn mutate(&self, arrangement: &mut Arrangement, rng: &mut StdRng) {
        let p = self.config.position_jitter;
        let r = self.config.rotation_jitter;
        for placement in arrangement.placements_mut() {
            if rng.random_bool(self.config.gene_mutation_rate) {
                placement.position += jitter(rng, p);
                placement.rotation += jitter(rng, r);
            }
        }
    }
}

/// Single-point crossover at a uniformly random interior index.
///
/// Returns the two complementary children `first[..p] + second[p..]` and
/// `second[..p] + first[p..]`. Parents of different lengths, or shorter than
/// two placements, yield clones of both parents.
pub(crate) fn crossover(
    first: &Arrangement,
    second: &Arrangement,
    rng: &mut StdRng,
) -> (Arrangement, Arrangement) {
    let len = first.len();
    if len != second.len() || len < 2 {
        return (first.clone(), second.clone());
    }
    let point = rng.random_range(1..len);
    let (a, b) = (first.placements(), second.placements());
    (splice(&a[..point], &b[point..]), splice(&b[..point], &a[point..]))
}

fn splice(head: &[Placement], tail: &[Placement]) -> Arrangement {
    head.iter().chain(tail).cloned().collect::<Vec<Placement>>().into()
}

fn jitter(rng: &mut StdRng, amplitude: f64) -> Vector3 {
    Vector3::new(
        rng.random_range(-amplitude..=amplitude),
        rng.random_range(-amplitude..=amplitude),
        rng.random_range(-amplitude..=amplitude),
    )
}

impl SearchStrategy for GeneticSearch<'_> {
    fn strategy_name(&self) -> &'static str {
        "genetic"
    }

    fn start(&mut self, rng: &mut StdRng, _stats: &mut SearchStats) -> Result<()> {
        let size = self.population_size();
        self.population = (0..size).map(|_| self.factory.random(rng)).collect();
        Ok(())
    }

    fn step(&mut self, rng: &mut StdRng, stats: &mut SearchStats) -> Result<()> {
        if self.population.is_empty() {
            return Ok(());
        }

        let scores = self.evaluate()?;
        stats.record_evaluations(scores.len() as u64);

        // Stable: among equal scores the earlier individual ranks first.
        let mut ranked: Vec<usize> = (0..scores.len()).collect();
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let top = ranked[0];
        let improved = self.best.as_ref().map_or(true, |(_, best)| scores[top] > *best);
        if improved {
            trace!(event = "improvement", strategy = "genetic", fitness = scores[top]);
            self.best = Some((self.population[top].clone(), scores[top]));
            stats.record_improvement();
        }

        let size = self.population.len();
        let mut next: Vec<Arrangement> = Vec::with_capacity(size);
        next.extend(
            ranked
                .iter()
                .take(self.config.elite_count(size))
                .map(|&i| self.population[i].clone()),
        );

        while next.len() < size {
            let a = self.tournament(&scores, rng);
            let b = self.tournament(&scores, rng);
            let (mut left, mut right) = crossover(&self.population[a], &self.population[b], rng);
            for child in [&mut left, &mut right] {
                if rng.random_bool(self.config.mutation_rate) {
                    self.mutate(child, rng);
                }
            }
            next.push(left);
            next.push(right);
        }

        // Children come in pairs; an odd remainder drops the last one.
        next.truncate(size);
        self.population = next;
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

impl fmt::Debug for GeneticSearch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneticSearch")
            .field("population_size", &self.population.len())
            .field("best_fitness", &self.best_fitness())
            .finish()
    }
}
