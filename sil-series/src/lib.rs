//! # ∑ sil-series — Soma de Séries Convergentes
//!
//! Soma uma série infinita (ou limitada pelo chamador) cujos termos são
//! produzidos um a um por uma função fornecida pelo chamador. Acumula
//! termos até o critério de convergência ou o limite de termos e devolve
//! a soma, opcionalmente somada a um valor inicial.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  SeriesConfig (validate)                             │
//! │         │                                            │
//! │         ▼                                            │
//! │  ┌──────────────────┐      ┌───────────────────────┐ │
//! │  │   TermSource     │ ───► │     Accumulator       │ │
//! │  │ Direct           │      │ Idle → Accumulating   │ │
//! │  │ Cooperative      │      │      → Done           │ │
//! │  │ Fallible         │      └──────────┬────────────┘ │
//! │  └──────────────────┘                 ▼              │
//! │                                 SeriesSummary        │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Política de parada
//!
//! - Sem `max_terms`: para quando o termo fica abaixo da tolerância
//!   (padrão `f64::EPSILON`) ou no limite de segurança [`SAFETY_CAP`].
//! - Com `max_terms`: consome exatamente `max_terms` termos, sem parada
//!   antecipada por tolerância.
//!
//! ## Exemplo
//!
//! ```
//! use sil_series::{sum_series, sum_series_with, SeriesConfig};
//!
//! // ln(1 + x) = Σ -(-x)^k / k
//! let x = 0.5;
//! let mut prod = -1.0;
//! let mut k = 0.0;
//! let ln = sum_series(move || {
//!     prod *= -x;
//!     k += 1.0;
//!     prod / k
//! })
//! .unwrap();
//! assert!((ln - 0.5_f64.ln_1p()).abs() < f64::EPSILON);
//!
//! // Soma exata dos três primeiros termos
//! let mut n = 0.0;
//! let six = sum_series_with(
//!     move || {
//!         n += 1.0;
//!         n
//!     },
//!     &SeriesConfig::new().with_max_terms(3),
//! )
//! .unwrap();
//! assert_eq!(six, 6.0);
//! ```

pub mod accumulator;
pub mod config;
pub mod error;
pub mod source;

pub use accumulator::{Accumulator, AccumulatorState, SeriesSummary, Termination};
pub use config::{
    ConvergenceCriterion, DEFAULT_INITIAL_VALUE, DEFAULT_TOLERANCE, SAFETY_CAP, SeriesConfig,
    TermStrategy,
};
pub use error::{SeriesError, SeriesResult};
pub use source::{CooperativeSource, DirectSource, FallibleSource, TermSource};

/// Soma a série com a configuração padrão
pub fn sum_series<F>(producer: F) -> SeriesResult<f64>
where
    F: FnMut() -> f64,
{
    sum_series_with(producer, &SeriesConfig::default())
}

/// Soma a série com configuração explícita
///
/// A estratégia de produção de termos vem de `config.strategy`; ambas
/// produzem o mesmo resultado.
pub fn sum_series_with<F>(producer: F, config: &SeriesConfig) -> SeriesResult<f64>
where
    F: FnMut() -> f64,
{
    config.validate()?;
    let accumulator = Accumulator::new(config);
    let summary = match config.strategy {
        TermStrategy::Direct => accumulator.run(DirectSource::new(producer))?,
        TermStrategy::Cooperative => accumulator.run(CooperativeSource::from_producer(producer))?,
    };
    Ok(summary.sum)
}

/// Soma a série de um produtor que pode falhar
///
/// O primeiro erro do produtor aborta a acumulação e é devolvido em
/// [`SeriesError::Producer`], sem resultado parcial.
pub fn try_sum_series<F, E>(mut producer: F, config: &SeriesConfig) -> SeriesResult<f64>
where
    F: FnMut() -> Result<f64, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    config.validate()?;
    let source = FallibleSource::new(move || producer().map_err(SeriesError::producer));
    Accumulator::new(config).run(source).map(|summary| summary.sum)
}

/// Soma a partir de qualquer [`TermSource`], devolvendo o resumo completo
pub fn sum_source<S>(source: S, config: &SeriesConfig) -> SeriesResult<SeriesSummary>
where
    S: TermSource,
    S::Error: Into<SeriesError>,
{
    config.validate()?;
    Accumulator::new(config).run(source)
}
