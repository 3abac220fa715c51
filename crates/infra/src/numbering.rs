//! Invoice numbering service.

use pizzapos_invoicing::InvoiceNumber;

use crate::error::StoreError;
use crate::stores::InvoiceCounter;

/// Issues `INV-####` numbers from a persistent counter.
///
/// The counter is an explicit dependency; each number costs exactly one
/// atomic increment, so two calls never return the same number. A failed
/// increment issues nothing.
#[derive(Debug, Clone)]
pub struct InvoiceNumbering<C> {
    counter: C,
}

impl<C: InvoiceCounter> InvoiceNumbering<C> {
    pub fn new(counter: C) -> Self {
        Self { counter }
    }

    pub fn next_invoice_number(&self) -> Result<InvoiceNumber, StoreError> {
        let sequence = self.counter.increment()?;
        let number = InvoiceNumber::from_sequence(sequence);
        tracing::debug!(invoice_number = %number, "issued invoice number");
        Ok(number)
    }

    /// Last issued number, if any.
    pub fn last_issued(&self) -> Result<Option<InvoiceNumber>, StoreError> {
        let current = self.counter.current()?;
        Ok((current > 0).then(|| InvoiceNumber::from_sequence(current)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    use proptest::prelude::*;

    use crate::backend::MemoryBackend;
    use crate::repository::Repository;

    fn numbering() -> (Arc<MemoryBackend>, InvoiceNumbering<Repository>) {
        let backend = Arc::new(MemoryBackend::new());
        let repo = Repository::new(backend.clone());
        (backend, InvoiceNumbering::new(repo))
    }

    #[test]
    fn first_numbers_are_sequential_and_padded() {
        let (_backend, numbering) = numbering();
        assert_eq!(numbering.last_issued().unwrap(), None);
        let issued: Vec<String> = (0..3)
            .map(|_| numbering.next_invoice_number().unwrap().to_string())
            .collect();
        assert_eq!(issued, vec!["INV-0001", "INV-0002", "INV-0003"]);
        assert_eq!(
            numbering.last_issued().unwrap().map(|n| n.to_string()),
            Some("INV-0003".to_string())
        );
    }

    #[test]
    fn failure_does_not_advance_counter() {
        let (backend, numbering) = numbering();
        numbering.next_invoice_number().unwrap();

        backend.set_online(false);
        let err = numbering.next_invoice_number().unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        backend.set_online(true);
        assert_eq!(numbering.next_invoice_number().unwrap().to_string(), "INV-0002");
    }

    #[test]
    fn concurrent_callers_never_share_a_number() {
        let (_backend, numbering) = numbering();
        let numbering = Arc::new(numbering);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let numbering = numbering.clone();
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| numbering.next_invoice_number().unwrap().sequence())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for n in h.join().unwrap() {
                assert!(seen.insert(n), "duplicate number {n}");
            }
        }
        assert_eq!(seen.len(), 200);
        assert_eq!(seen.iter().max(), Some(&200));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 32,
            ..ProptestConfig::default()
        })]

        /// Property: N sequential calls yield INV-0001..INV-N with no repeats.
        #[test]
        fn sequential_calls_are_distinct(n in 1usize..200usize) {
            let (_backend, numbering) = numbering();
            let issued: Vec<String> = (0..n)
                .map(|_| numbering.next_invoice_number().unwrap().to_string())
                .collect();
            let expected: Vec<String> = (1..=n).map(|i| format!("INV-{i:04}")).collect();
            prop_assert_eq!(issued, expected);
        }
    }
}
