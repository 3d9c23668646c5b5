//! Configuração da soma de séries
//!
//! Registro imutável passado uma vez por chamada. Todas as chaves são
//! opcionais; chaves desconhecidas no JSON são ignoradas.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SeriesError, SeriesResult};

/// Tolerância padrão (epsilon de máquina para f64)
pub const DEFAULT_TOLERANCE: f64 = f64::EPSILON;

/// Valor inicial padrão da soma
pub const DEFAULT_INITIAL_VALUE: f64 = 0.0;

/// Limite interno de termos quando `max_terms` não é informado
pub const SAFETY_CAP: u64 = 1_000_000;

/// Critério de convergência aplicado a cada termo
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConvergenceCriterion {
    /// Para quando `|t| < tolerance`
    #[default]
    Absolute,
    /// Para quando `|t| <= tolerance * |sum|`
    Relative,
}

impl ConvergenceCriterion {
    /// Verifica se o termo é desprezível para a soma corrente
    #[inline]
    pub fn is_negligible(self, term: f64, sum: f64, tolerance: f64) -> bool {
        match self {
            Self::Absolute => term.abs() < tolerance,
            Self::Relative => term.abs() <= (tolerance * sum).abs(),
        }
    }
}

/// Estratégia de produção de termos
///
/// Ambas produzem somas bit a bit idênticas; a escolha é apenas de fluxo
/// de controle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TermStrategy {
    /// Chama o produtor diretamente no laço
    #[default]
    Direct,
    /// Puxa termos de um iterador preguiçoso sobre o produtor
    Cooperative,
}

impl fmt::Display for TermStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Cooperative => write!(f, "cooperative"),
        }
    }
}

/// Configuração de uma chamada de soma
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesConfig {
    /// Semente adicionada à soma antes da acumulação
    pub initial_value: f64,
    /// Limiar de convergência (não negativo)
    pub tolerance: f64,
    /// Número exato de termos; desativa a parada por tolerância
    pub max_terms: Option<u64>,
    /// Critério de convergência
    pub criterion: ConvergenceCriterion,
    /// Estratégia de produção de termos
    pub strategy: TermStrategy,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            initial_value: DEFAULT_INITIAL_VALUE,
            tolerance: DEFAULT_TOLERANCE,
            max_terms: None,
            criterion: ConvergenceCriterion::Absolute,
            strategy: TermStrategy::Direct,
        }
    }
}

impl SeriesConfig {
    /// Cria nova configuração
    pub fn new() -> Self {
        Self::default()
    }

    /// Lê e valida configuração a partir de JSON
    pub fn from_json(json: &str) -> SeriesResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_initial_value(mut self, value: f64) -> Self {
        self.initial_value = value;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_terms(mut self, max_terms: u64) -> Self {
        self.max_terms = Some(max_terms);
        self
    }

    pub fn with_criterion(mut self, criterion: ConvergenceCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn with_strategy(mut self, strategy: TermStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Modo de contagem exata: `max_terms` explícito tem precedência
    /// sobre a tolerância
    pub fn is_exact_count(&self) -> bool {
        self.max_terms.is_some()
    }

    /// Limite efetivo de termos
    pub fn effective_limit(&self) -> u64 {
        self.max_terms.unwrap_or(SAFETY_CAP)
    }

    /// Valida tipos e faixas antes de qualquer termo ser consumido
    pub fn validate(&self) -> SeriesResult<()> {
        if !self.initial_value.is_finite() {
            return Err(SeriesError::invalid(format!(
                "initialValue deve ser finito, recebido {}",
                self.initial_value
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SeriesError::invalid(format!(
                "tolerance deve ser um número não negativo, recebido {}",
                self.tolerance
            )));
        }
        if self.max_terms == Some(0) {
            return Err(SeriesError::invalid("maxTerms deve ser um inteiro positivo"));
        }
        Ok(())
    }
}
