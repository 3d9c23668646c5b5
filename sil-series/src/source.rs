//! Adaptadores de fonte de termos
//!
//! Apresentam cada termo produzido ao acumulador como uma sequência
//! preguiçosa, de passo único e apenas para frente. Não são reiniciáveis:
//! chamar o produtor de novo avança o estado dele, não repete o histórico.
//!
//! ```text
//! produtor ──► DirectSource ─────┐
//!                                ├──► TermSource::next_term ──► Accumulator
//! iterador ──► CooperativeSource ┘
//! ```

use std::convert::Infallible;

use crate::error::SeriesError;

/// Fonte de termos de uma série
pub trait TermSource {
    /// Erro sinalizado pelo produtor
    type Error;

    /// Próximo termo da série
    fn next_term(&mut self) -> Result<f64, Self::Error>;

    /// Termos entregues até agora
    fn terms_consumed(&self) -> u64;
}

impl<S: TermSource + ?Sized> TermSource for &mut S {
    type Error = S::Error;

    fn next_term(&mut self) -> Result<f64, Self::Error> {
        (**self).next_term()
    }

    fn terms_consumed(&self) -> u64 {
        (**self).terms_consumed()
    }
}

/// Estratégia direta: chama o produtor a cada termo
pub struct DirectSource<F> {
    producer: F,
    consumed: u64,
}

impl<F> DirectSource<F>
where
    F: FnMut() -> f64,
{
    pub fn new(producer: F) -> Self {
        Self { producer, consumed: 0 }
    }
}

impl<F> TermSource for DirectSource<F>
where
    F: FnMut() -> f64,
{
    type Error = Infallible;

    #[inline]
    fn next_term(&mut self) -> Result<f64, Infallible> {
        self.consumed += 1;
        Ok((self.producer)())
    }

    fn terms_consumed(&self) -> u64 {
        self.consumed
    }
}

/// Estratégia cooperativa: puxa termos de um iterador suspenso
///
/// O iterador só avança quando o acumulador pede o próximo termo.
pub struct CooperativeSource<I> {
    terms: I,
    consumed: u64,
}

impl<I> CooperativeSource<I>
where
    I: Iterator<Item = f64>,
{
    /// Envolve qualquer iterador de termos
    pub fn new(terms: I) -> Self {
        Self { terms, consumed: 0 }
    }
}

impl<F> CooperativeSource<std::iter::RepeatWith<F>>
where
    F: FnMut() -> f64,
{
    /// Gerador infinito sobre um produtor
    pub fn from_producer(producer: F) -> Self {
        Self::new(std::iter::repeat_with(producer))
    }
}

impl<I> TermSource for CooperativeSource<I>
where
    I: Iterator<Item = f64>,
{
    type Error = SeriesError;

    fn next_term(&mut self) -> Result<f64, SeriesError> {
        match self.terms.next() {
            Some(term) => {
                self.consumed += 1;
                Ok(term)
            }
            None => Err(SeriesError::Exhausted { consumed: self.consumed }),
        }
    }

    fn terms_consumed(&self) -> u64 {
        self.consumed
    }
}

/// Produtor que pode falhar; o erro é repassado sem alteração
pub struct FallibleSource<F> {
    producer: F,
    consumed: u64,
}

impl<F, E> FallibleSource<F>
where
    F: FnMut() -> Result<f64, E>,
{
    pub fn new(producer: F) -> Self {
        Self { producer, consumed: 0 }
    }
}

impl<F, E> TermSource for FallibleSource<F>
where
    F: FnMut() -> Result<f64, E>,
{
    type Error = E;

    fn next_term(&mut self) -> Result<f64, E> {
        let term = (self.producer)()?;
        self.consumed += 1;
        Ok(term)
    }

    fn terms_consumed(&self) -> u64 {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_source_advances_producer() {
        let mut k = 0.0;
        let mut source = DirectSource::new(|| {
            k += 1.0;
            k
        });
        assert_eq!(source.next_term().unwrap(), 1.0);
        assert_eq!(source.next_term().unwrap(), 2.0);
        assert_eq!(source.terms_consumed(), 2);
    }

    #[test]
    fn test_cooperative_source_exhausted() {
        let mut source = CooperativeSource::new([1.0, 2.0].into_iter());
        assert_eq!(source.next_term().unwrap(), 1.0);
        assert_eq!(source.next_term().unwrap(), 2.0);
        let err = source.next_term().unwrap_err();
        assert!(matches!(err, SeriesError::Exhausted { consumed: 2 }));
    }

    #[test]
    fn test_fallible_source_propagates() {
        let mut calls = 0;
        let mut source = FallibleSource::new(|| {
            calls += 1;
            if calls > 1 { Err("boom") } else { Ok(0.5) }
        });
        assert_eq!(source.next_term(), Ok(0.5));
        assert_eq!(source.next_term(), Err("boom"));
        assert_eq!(source.terms_consumed(), 1);
    }
}
