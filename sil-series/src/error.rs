//! Tipos de erro para sil-series

use std::convert::Infallible;
use thiserror::Error;

/// Resultado de operações de soma de séries
pub type SeriesResult<T> = Result<T, SeriesError>;

/// Erros que podem ocorrer ao somar uma série
#[derive(Debug, Error)]
pub enum SeriesError {
    /// Argumento inválido (detectado antes de consumir qualquer termo)
    #[error("Argumento inválido: {0}")]
    InvalidArgument(String),

    /// Configuração JSON malformada
    #[error("Configuração de série inválida: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// O produtor de termos sinalizou um erro
    #[error("Falha no produtor de termos: {0}")]
    Producer(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// O produtor devolveu NaN
    #[error("Termo não numérico na posição {index}: {value}")]
    NonFiniteTerm { index: u64, value: f64 },

    /// A soma corrente virou NaN (por exemplo, `inf + -inf`)
    #[error("Soma indefinida após o termo {index} ({term})")]
    NonFiniteSum { index: u64, term: f64 },

    /// A fonte de termos acabou antes de uma condição de parada
    #[error("Fonte de termos esgotada após {consumed} termos")]
    Exhausted { consumed: u64 },
}

impl SeriesError {
    /// Cria erro de argumento inválido
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Encapsula o erro de um produtor sem alterá-lo
    pub fn producer<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Producer(Box::new(err))
    }

    /// Erro de validação (levantado antes da acumulação)
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::InvalidConfig(_))
    }

    /// Erro originado no produtor durante a acumulação
    pub fn is_producer_failure(&self) -> bool {
        matches!(
            self,
            Self::Producer(_)
                | Self::NonFiniteTerm { .. }
                | Self::NonFiniteSum { .. }
                | Self::Exhausted { .. }
        )
    }
}

impl From<Infallible> for SeriesError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
