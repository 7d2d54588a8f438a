use std::{io, time::Duration};

use crossterm::{execute, terminal::SetTitle};
use oxello_training::genetic::{
    GameReport, GenerationSummary, GeneticParams, Individual, ProgressReporter,
};

use crate::util;

const TITLE: &str = "Reversi Weight Optimizer";

/// Terminal title showing `<generation>/<generations> : <best score>`.
///
/// The best score only ever increases.
#[derive(Debug, Default)]
pub struct TitleBar {
    generations: usize,
    generation: usize,
    best_score: Option<f32>,
}

impl TitleBar {
    pub fn set_generations(&mut self, generations: usize) {
        self.generations = generations;
        self.update();
    }

    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
        self.update();
    }

    pub fn set_best_score(&mut self, score: f32) {
        if self.best_score.is_none_or(|best| score > best) {
            self.best_score = Some(score);
            self.update();
        }
    }

    fn title(&self) -> String {
        let best = self
            .best_score
            .map_or_else(|| "-".to_owned(), |score| format!("{score:.0}"));
        format!("{}/{} : {best} {TITLE}", self.generation, self.generations)
    }

    fn update(&self) {
        if let Err(e) = execute!(io::stderr(), SetTitle(self.title())) {
            log::debug!("failed to set terminal title: {e}");
        }
    }
}

/// Prints training progress to stderr and mirrors it in the terminal title.
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    title: TitleBar,
}

impl ProgressReporter for ConsoleProgress {
    fn run_started(&mut self, enemy_count: usize, params: &GeneticParams) {
        eprintln!("EnemySize: {enemy_count}");
        eprintln!("PopulationSize: {}", params.population_size);
        eprintln!("TopPerformersSize: {}", params.elite_count);
        eprintln!("MutationRate: {}", params.mutation_rate);
        eprintln!();
        self.title.set_generations(params.generations);
    }

    fn generation_started(&mut self, generation: usize, generations: usize) {
        eprintln!("{}", "#".repeat(72));
        eprintln!("Generation: {} / {generations}", generation + 1);
        self.title.set_generation(generation + 1);
    }

    fn individual_started(&mut self, generation: usize, index: usize) {
        eprintln!(
            "==================== {} : {} ========================",
            generation + 1,
            index + 1
        );
    }

    fn match_played(&mut self, report: &GameReport) {
        let cached = if report.cached { " (cached)" } else { "" };
        eprintln!(
            "{} vs {} : {}{cached}",
            report.color.to_char(),
            report.enemy,
            report.fitness
        );
    }

    fn individual_evaluated(&mut self, _index: usize, individual: &Individual, elapsed: Duration) {
        eprintln!("{} {elapsed:.1?}", util::now());
        eprintln!("score: {}", individual.fitness());
        self.title.set_best_score(individual.fitness());
    }

    fn generation_finished(&mut self, summary: &GenerationSummary<'_>) {
        eprintln!();
        eprintln!("{} {:.1?}", util::now(), summary.elapsed);
        if let Some(best) = summary.best() {
            eprintln!("Best AI Score: {}", best.fitness());
            eprintln!("{}", best.weights());
        }

        let population = summary.population;
        if let Some(fitness) = population.compute_fitness_stats() {
            eprintln!("  Fitness Stats: {fitness:.1}");
        }
        let weight_stats = population.compute_weight_stats();
        eprintln!(
            "  Weights Mean:       {:.3?}",
            weight_stats.iter().map(|s| s.mean).collect::<Vec<_>>()
        );
        eprintln!(
            "  Weights NormStddev: {:.3?}",
            weight_stats
                .iter()
                .map(|s| s.normalized_std_dev)
                .collect::<Vec<_>>()
        );
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_best_score_only_increases() {
        let mut title = TitleBar::default();
        assert_eq!(title.title(), "0/0 : - Reversi Weight Optimizer");

        title.generations = 20;
        title.generation = 3;
        title.set_best_score(-12.0);
        assert_eq!(title.title(), "3/20 : -12 Reversi Weight Optimizer");
        title.set_best_score(40.0);
        title.set_best_score(5.0);
        assert_eq!(title.title(), "3/20 : 40 Reversi Weight Optimizer");
    }
}
