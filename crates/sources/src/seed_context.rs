//! Resolve seed titles against the catalog into a `SeedContext`

use crate::error::{Result, SourceError};
use crate::types::SeedContext;
use data_loader::Catalog;
use std::collections::HashSet;

/// Build a `SeedContext` from the seed titles of a request.
///
/// Every title must resolve exactly (surrounding whitespace ignored); the
/// first title that does not is reported as `UnknownMovie`. Titles that
/// resolve to the same record collapse into one seed.
pub fn build_seed_context<S: AsRef<str>>(catalog: &Catalog, titles: &[S]) -> Result<SeedContext> {
    let mut seed_ids = Vec::with_capacity(titles.len());
    let mut seed_titles = HashSet::with_capacity(titles.len());

    for title in titles {
        let title = title.as_ref();
        let movie = catalog
            .lookup_by_title(title)
            .ok_or_else(|| SourceError::UnknownMovie {
                title: title.to_string(),
            })?;
        seed_ids.push(movie.id);
        seed_titles.insert(movie.title.clone());
    }

    seed_ids.sort_unstable();
    seed_ids.dedup();

    Ok(SeedContext {
        seed_ids,
        seed_titles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Movie;

    fn create_test_catalog() -> Catalog {
        Catalog::from_movies(vec![
            Movie::new(3, "Heat (1995)"),
            Movie::new(1, "Toy Story (1995)"),
            Movie::new(2, "Jumanji (1995)"),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolves_titles() {
        let catalog = create_test_catalog();
        let context =
            build_seed_context(&catalog, &["Heat (1995)", " Toy Story (1995) ", "Jumanji (1995)"]).unwrap();

        assert_eq!(context.seed_ids, vec![1, 2, 3]);
        assert!(context.is_seed(2));
        assert!(!context.is_seed(4));
        assert!(context.is_seed_title("Toy Story (1995)"));
    }

    #[test]
    fn test_duplicate_seeds_collapse() {
        let catalog = create_test_catalog();
        let context =
            build_seed_context(&catalog, &["Heat (1995)", "Heat (1995)", "Jumanji (1995)"]).unwrap();
        assert_eq!(context.seed_ids, vec![2, 3]);
        assert_eq!(context.seed_titles.len(), 2);
    }

    #[test]
    fn test_unknown_title() {
        let catalog = create_test_catalog();
        let err = build_seed_context(&catalog, &["Heat (1995)", "Nope", "Also Nope"]).unwrap_err();
        match err {
            SourceError::UnknownMovie { title } => assert_eq!(title, "Nope"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
