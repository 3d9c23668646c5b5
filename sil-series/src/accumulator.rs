//! Acumulador convergente
//!
//! Consome termos um a um, mantém a soma corrente e aplica a política de
//! parada após cada termo.
//!
//! ## Máquina de estados
//!
//! ```text
//! Idle ──step──► Accumulating ──(parada)──► Done(Termination)
//! ```
//!
//! Exatamente uma condição de parada dispara por chamada:
//!
//! | Modo                    | Condição                         | Termination |
//! |-------------------------|----------------------------------|-------------|
//! | `max_terms` explícito   | `term_count == max_terms`        | `TermLimit` |
//! | tolerância              | termo desprezível                | `Converged` |
//! | tolerância              | `term_count == SAFETY_CAP`       | `SafetyCap` |

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

use crate::config::{ConvergenceCriterion, SeriesConfig};
use crate::error::{SeriesError, SeriesResult};
use crate::source::TermSource;

/// Motivo do término da acumulação
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// Termo abaixo da tolerância
    Converged,
    /// Número exato de termos pedido pelo chamador
    TermLimit,
    /// Limite interno atingido sem convergência (resultado aproximado)
    SafetyCap,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Converged => "Converged",
            Self::TermLimit => "TermLimit",
            Self::SafetyCap => "SafetyCap",
        };
        write!(f, "{}", name)
    }
}

/// Estado do acumulador
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AccumulatorState {
    /// Antes do primeiro termo
    #[default]
    Idle,
    /// Consumindo termos
    Accumulating,
    /// Terminal
    Done(Termination),
}

/// Resultado completo de uma soma
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Soma acumulada (inclui o valor inicial)
    pub sum: f64,
    /// Termos consumidos
    pub terms: u64,
    /// Condição de parada que disparou
    pub termination: Termination,
    /// Último termo consumido
    pub last_term: f64,
}

impl SeriesSummary {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Acumulador de uma única chamada de soma
#[derive(Debug, Clone)]
pub struct Accumulator {
    sum: f64,
    term_count: u64,
    previous_term: Option<f64>,
    current_term: Option<f64>,
    state: AccumulatorState,
    tolerance: f64,
    limit: u64,
    exact_count: bool,
    criterion: ConvergenceCriterion,
}

impl Accumulator {
    /// Cria acumulador a partir de uma configuração já validada
    ///
    /// `max_terms = Some(0)` é tratado como um único termo.
    pub fn new(config: &SeriesConfig) -> Self {
        Self {
            sum: config.initial_value,
            term_count: 0,
            previous_term: None,
            current_term: None,
            state: AccumulatorState::Idle,
            tolerance: config.tolerance,
            limit: config.effective_limit().max(1),
            exact_count: config.is_exact_count(),
            criterion: config.criterion,
        }
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn term_count(&self) -> u64 {
        self.term_count
    }

    pub fn state(&self) -> AccumulatorState {
        self.state
    }

    pub fn previous_term(&self) -> Option<f64> {
        self.previous_term
    }

    pub fn current_term(&self) -> Option<f64> {
        self.current_term
    }

    /// Consome um termo. Retorna `Some` quando a acumulação termina.
    ///
    /// Depois de `Done`, devolve a terminação registrada sem consumir termos.
    pub fn step<S>(&mut self, source: &mut S) -> SeriesResult<Option<Termination>>
    where
        S: TermSource,
        S::Error: Into<SeriesError>,
    {
        match self.state {
            AccumulatorState::Done(termination) => return Ok(Some(termination)),
            AccumulatorState::Idle => {
                debug!(
                    exact_count = self.exact_count,
                    limit = self.limit,
                    tolerance = self.tolerance,
                    criterion = ?self.criterion,
                    "iniciando acumulação"
                );
                self.state = AccumulatorState::Accumulating;
            }
            AccumulatorState::Accumulating => {}
        }

        let term = source.next_term().map_err(Into::<SeriesError>::into)?;
        if term.is_nan() {
            return Err(SeriesError::NonFiniteTerm {
                index: self.term_count,
                value: term,
            });
        }

        let sum = self.sum + term;
        if sum.is_nan() {
            return Err(SeriesError::NonFiniteSum {
                index: self.term_count,
                term,
            });
        }

        self.previous_term = self.current_term.replace(term);
        self.sum = sum;
        self.term_count += 1;
        trace!(k = self.term_count, term, sum = self.sum, "termo");

        let termination = self.check_termination(term);
        if let Some(termination) = termination {
            self.finish(termination);
        }
        Ok(termination)
    }

    /// Consome termos até uma condição de parada
    pub fn run<S>(mut self, mut source: S) -> SeriesResult<SeriesSummary>
    where
        S: TermSource,
        S::Error: Into<SeriesError>,
    {
        loop {
            if let Some(termination) = self.step(&mut source)? {
                return Ok(SeriesSummary {
                    sum: self.sum,
                    terms: self.term_count,
                    termination,
                    last_term: self.current_term.unwrap_or(0.0),
                });
            }
        }
    }

    fn check_termination(&self, term: f64) -> Option<Termination> {
        if self.exact_count {
            // Contagem exata: sem parada antecipada por tolerância
            return (self.term_count >= self.limit).then_some(Termination::TermLimit);
        }
        if self.criterion.is_negligible(term, self.sum, self.tolerance) {
            Some(Termination::Converged)
        } else if self.term_count >= self.limit {
            Some(Termination::SafetyCap)
        } else {
            None
        }
    }

    fn finish(&mut self, termination: Termination) {
        self.state = AccumulatorState::Done(termination);
        if termination == Termination::SafetyCap {
            warn!(
                terms = self.term_count,
                sum = self.sum,
                "série não convergiu antes do limite de segurança"
            );
        } else {
            debug!(
                %termination,
                terms = self.term_count,
                sum = self.sum,
                "acumulação concluída"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DirectSource;

    #[test]
    fn test_state_transitions() {
        let config = SeriesConfig::new().with_max_terms(2);
        let mut acc = Accumulator::new(&config);
        let mut source = DirectSource::new(|| 1.0);

        assert_eq!(acc.state(), AccumulatorState::Idle);
        assert_eq!(acc.step(&mut source).unwrap(), None);
        assert_eq!(acc.state(), AccumulatorState::Accumulating);
        assert_eq!(acc.step(&mut source).unwrap(), Some(Termination::TermLimit));
        assert_eq!(acc.state(), AccumulatorState::Done(Termination::TermLimit));

        // Done é terminal
        assert_eq!(acc.step(&mut source).unwrap(), Some(Termination::TermLimit));
        assert_eq!(source.terms_consumed(), 2);
        assert_eq!(acc.sum(), 2.0);
    }

    #[test]
    fn test_previous_and_current_term() {
        let mut k = 0.0;
        let mut source = DirectSource::new(|| {
            k += 1.0;
            k
        });
        let mut acc = Accumulator::new(&SeriesConfig::new().with_max_terms(5));
        acc.step(&mut source).unwrap();
        acc.step(&mut source).unwrap();
        assert_eq!(acc.previous_term(), Some(1.0));
        assert_eq!(acc.current_term(), Some(2.0));
        assert_eq!(acc.term_count(), 2);
    }

    #[test]
    fn test_converged_wins_over_cap_on_same_term() {
        let config = SeriesConfig::new().with_tolerance(0.5);
        let mut acc = Accumulator::new(&config);
        acc.limit = 1;
        let summary = acc.run(DirectSource::new(|| 0.1)).unwrap();
        assert_eq!(summary.termination, Termination::Converged);
        assert_eq!(summary.terms, 1);
    }

    #[test]
    fn test_nan_term_rejected() {
        let mut k = 0;
        let source = DirectSource::new(|| {
            k += 1;
            if k == 3 { f64::NAN } else { 1.0 }
        });
        let err = Accumulator::new(&SeriesConfig::default()).run(source).unwrap_err();
        assert!(matches!(err, SeriesError::NonFiniteTerm { index: 2, .. }));
        assert!(err.is_producer_failure());
    }

    #[test]
    fn test_unvalidated_zero_max_terms_consumes_one_term() {
        let config = SeriesConfig {
            max_terms: Some(0),
            ..SeriesConfig::default()
        };
        let mut calls = 0;
        let source = DirectSource::new(|| {
            calls += 1;
            7.0
        });
        let summary = Accumulator::new(&config).run(source).unwrap();
        assert_eq!(summary.terms, 1);
        assert_eq!(summary.sum, 7.0);
        assert_eq!(summary.termination, Termination::TermLimit);
        assert_eq!(calls, 1);
    }
}
