//! Column-parallel loops over `n × k` data.
//!
//! Every source column of the batched search is independent within a step, so
//! columns are the unit of work. With the `parallel` feature the loops fan out on
//! rayon's pool; without it they run in order. The closures are the same either
//! way, so results do not depend on the feature.
//!
//! Output vectors are reserved with `try_reserve_exact` before anything is
//! written, so an oversized batch reports [`BcError::OutOfMemory`] instead of
//! aborting.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{try_with_capacity, BcError};

/// Maps `f` over columns `0..k`, giving each worker its own scratch value.
///
/// The error of the lowest failing column is returned; a failed `init` fails
/// every column that worker would have run.
pub(crate) fn map_columns<W, R, I, F>(k: usize, init: I, f: F) -> Result<Vec<R>, BcError>
where
    I: Fn() -> Result<W, BcError> + Sync + Send,
    F: Fn(&mut W, usize) -> Result<R, BcError> + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        let mut results = try_with_capacity(k)?;
        (0..k)
            .into_par_iter()
            .map_init(init, |scratch, j| match scratch {
                Ok(w) => f(w, j),
                Err(e) => Err(e.clone()),
            })
            .collect_into_vec(&mut results);
        let mut columns = try_with_capacity(k)?;
        for r in results {
            columns.push(r?);
        }
        Ok(columns)
    }
    #[cfg(not(feature = "parallel"))]
    {
        let mut columns = try_with_capacity(k)?;
        if k > 0 {
            let mut scratch = init()?;
            for j in 0..k {
                columns.push(f(&mut scratch, j)?);
            }
        }
        Ok(columns)
    }
}

/// Runs `f(j, column)` for every `nrows`-long column of a column-major buffer.
pub(crate) fn for_each_column_mut<T, F>(data: &mut [T], nrows: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    if nrows == 0 {
        return;
    }
    #[cfg(feature = "parallel")]
    {
        data.par_chunks_mut(nrows)
            .enumerate()
            .for_each(|(j, col)| f(j, col));
    }
    #[cfg(not(feature = "parallel"))]
    {
        data.chunks_mut(nrows)
            .enumerate()
            .for_each(|(j, col)| f(j, col));
    }
}

/// Maps `f` over rows `0..n`.
pub(crate) fn map_rows<R, F>(n: usize, f: F) -> Result<Vec<R>, BcError>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    let mut out = try_with_capacity(n)?;
    #[cfg(feature = "parallel")]
    {
        (0..n).into_par_iter().map(f).collect_into_vec(&mut out);
    }
    #[cfg(not(feature = "parallel"))]
    {
        out.extend((0..n).map(f));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_columns_keeps_column_order() {
        let out = map_columns(5, || Ok(0usize), |calls, j| {
            *calls += 1;
            Ok(j * 10)
        })
        .unwrap();
        assert_eq!(out, vec![0, 10, 20, 30, 40]);
    }

    #[test]
    fn map_columns_surfaces_errors() {
        let oom = BcError::OutOfMemory { requested: 9 };
        let failed_init = map_columns(3, || Err::<(), _>(oom.clone()), |(), j| Ok(j));
        assert_eq!(failed_init, Err(oom.clone()));

        let failed_column = map_columns(
            4,
            || Ok(()),
            |(), j| if j == 2 { Err(oom.clone()) } else { Ok(j) },
        );
        assert_eq!(failed_column, Err(oom.clone()));

        // With no columns, a failing scratch allocation is never observed.
        assert_eq!(map_columns(0, || Err::<(), _>(oom.clone()), |(), j| Ok(j)), Ok(vec![]));
    }

    #[test]
    fn map_rows_and_column_writes() {
        assert_eq!(map_rows(4, |i| i * i), Ok(vec![0, 1, 4, 9]));

        let mut data = vec![0usize; 6];
        for_each_column_mut(&mut data, 3, |j, col| col.fill(j + 1));
        assert_eq!(data, vec![1, 1, 1, 2, 2, 2]);
    }
}
