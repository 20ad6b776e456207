/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Binomial coefficient C(n, k); zero for negative or out of range arguments
#[cfg(test)]
pub(crate) fn combinations(n: i64, k: i64) -> u64 {
    if n < 0 || k < 0 || k > n {
        return 0;
    }
    let k = k.min(n - k) as u128;
    let n = n as u128;
    let mut result: u128 = 1;
    for i in 1..=k {
        // Exact at every step: result * (n - k + i) is divisible by i
        result = result * (n - k + i) / i;
    }
    u64::try_from(result).unwrap_or(u64::MAX)
}

/// Yields C(n, 0), C(n, 1), ..., C(n, n) in order, deriving each value from the previous one.
///
/// Asking for more than `n + 1` values is a programming error and panics.
pub(crate) struct CombinationSequence {
    n: u64,
    k: u64,
    current: u64,
}

impl CombinationSequence {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            n: n as u64,
            k: 0,
            current: 1,
        }
    }

    pub(crate) fn next_value(&mut self) -> u64 {
        assert!(
            self.k <= self.n,
            "combination sequence for n={} exhausted after {} values",
            self.n,
            self.n + 1
        );
        let value = self.current;
        self.k += 1;
        if self.k <= self.n {
            let next = u128::from(self.current) * u128::from(self.n - self.k + 1) / u128::from(self.k);
            self.current = u64::try_from(next).unwrap_or(u64::MAX);
        }
        value
    }
}
