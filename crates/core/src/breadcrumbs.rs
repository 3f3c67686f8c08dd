//! Breadcrumb trails for the listing and detail pages.

use crate::catalog::{Catalog, Procedure};
use crate::constants::{CATALOG_PATH, CATALOG_ROOT_LABEL};
use crate::navigation::CatalogNavigator;
use crate::query::{listing_href, QueryParams};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    /// `None` renders as plain text.
    pub href: Option<String>,
    pub highlighted: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub crumbs: Vec<Crumb>,
}

impl Breadcrumb {
    fn root(highlighted: bool) -> Crumb {
        Crumb {
            label: CATALOG_ROOT_LABEL.to_owned(),
            href: Some(CATALOG_PATH.to_owned()),
            highlighted,
        }
    }
}

/// Listing page trail. Only shown once a category is selected.
///
/// Without a subcategory the root crumb is highlighted on its own. With one, a category crumb
/// pointing back to the category step follows and is highlighted instead.
pub fn listing_breadcrumb(nav: &CatalogNavigator<'_>) -> Option<Breadcrumb> {
    let category = nav.category()?;

    let mut crumbs = Vec::new();
    match nav.subcategory_label() {
        Some(_) => {
            crumbs.push(Breadcrumb::root(false));
            crumbs.push(Crumb {
                label: category.to_owned(),
                href: Some(listing_href(&QueryParams {
                    cat: Some(category.to_owned()),
                    step: Some(1),
                    ..QueryParams::default()
                })),
                highlighted: true,
            });
        }
        None => crumbs.push(Breadcrumb::root(true)),
    }
    Some(Breadcrumb { crumbs })
}

/// Detail page trail. Only shown when the detail URL carries a category.
///
/// The category crumb uses the procedure's own category. The subcategory crumb uses the
/// procedure's own subcategory, else the label resolved from `sub`, and links only when `sub`
/// is present. The last crumb is highlighted.
pub fn procedure_breadcrumb(
    catalog: &Catalog,
    procedure: &Procedure,
    params: &QueryParams,
) -> Option<Breadcrumb> {
    params.cat.as_ref()?;

    let category = procedure.category.clone();
    let subcategory = procedure.subcategory.clone().or_else(|| {
        params
            .sub
            .as_deref()
            .map(|slug| catalog.subcategory_table().resolve_label(slug))
    });

    let mut crumbs = vec![
        Breadcrumb::root(false),
        Crumb {
            label: category.clone(),
            href: Some(listing_href(&QueryParams {
                cat: Some(category.clone()),
                step: Some(if subcategory.is_some() { 2 } else { 1 }),
                ..QueryParams::default()
            })),
            highlighted: subcategory.is_none(),
        },
    ];

    if let Some(label) = subcategory {
        let href = params.sub.as_ref().map(|slug| {
            listing_href(&QueryParams {
                cat: Some(category.clone()),
                sub: Some(slug.clone()),
                step: Some(2),
                ..QueryParams::default()
            })
        });
        crumbs.push(Crumb {
            label,
            href,
            highlighted: true,
        });
    }

    Some(Breadcrumb { crumbs })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
categories:
  - label: Aesthetic
  - label: Reconstructive
subcategories:
  - slug: prosopo
    label: Πρόσωπο
    description: d
  - slug: soma
    label: Σώμα
    description: d
procedures:
  - { id: a, title: A, slug: a, category: Aesthetic, subcategory: Πρόσωπο, short_desc: x }
  - { id: b, title: B, slug: b, category: Aesthetic, subcategory: Σώμα, short_desc: x }
  - { id: c, title: C, slug: c, category: Reconstructive, short_desc: x }
"#;

    fn catalog() -> Catalog {
        Catalog::from_yaml_str(CATALOG).expect("catalog")
    }

    fn labels(breadcrumb: &Breadcrumb) -> Vec<&str> {
        breadcrumb.crumbs.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn listing_breadcrumb_hidden_without_category() {
        let catalog = catalog();
        let nav = CatalogNavigator::new(&catalog);
        assert!(listing_breadcrumb(&nav).is_none());
    }

    #[test]
    fn listing_breadcrumb_highlights_root_at_step_two() {
        let catalog = catalog();
        let mut nav = CatalogNavigator::new(&catalog);
        nav.select_category("Aesthetic");
        let trail = listing_breadcrumb(&nav).expect("category selected");
        assert_eq!(labels(&trail), [CATALOG_ROOT_LABEL]);
        assert!(trail.crumbs[0].highlighted);
    }

    #[test]
    fn listing_breadcrumb_adds_category_with_subcategory() {
        let catalog = catalog();
        let mut nav = CatalogNavigator::new(&catalog);
        nav.select_category("Aesthetic");
        nav.select_subcategory("soma").expect("category selected");
        let trail = listing_breadcrumb(&nav).expect("category selected");
        assert_eq!(labels(&trail), [CATALOG_ROOT_LABEL, "Aesthetic"]);
        assert_eq!(
            trail.crumbs[1].href.as_deref(),
            Some("/catalog?cat=Aesthetic&step=1")
        );
        assert!(trail.crumbs[1].highlighted);
        assert!(!trail.crumbs[0].highlighted);
    }

    #[test]
    fn procedure_breadcrumb_requires_category_param() {
        let catalog = catalog();
        let procedure = catalog.by_slug("a").unwrap();
        assert!(procedure_breadcrumb(&catalog, procedure, &QueryParams::default()).is_none());
    }

    #[test]
    fn procedure_breadcrumb_links_subcategory_when_sub_present() {
        let catalog = catalog();
        let procedure = catalog.by_slug("a").unwrap();
        let params = QueryParams::parse("cat=Aesthetic&sub=prosopo");
        let trail = procedure_breadcrumb(&catalog, procedure, &params).expect("cat present");

        assert_eq!(labels(&trail), [CATALOG_ROOT_LABEL, "Aesthetic", "Πρόσωπο"]);
        assert_eq!(
            trail.crumbs[1].href.as_deref(),
            Some("/catalog?cat=Aesthetic&step=2")
        );
        assert_eq!(
            trail.crumbs[2].href.as_deref(),
            Some("/catalog?cat=Aesthetic&sub=prosopo&step=2")
        );
        assert!(trail.crumbs[2].highlighted);
    }

    #[test]
    fn procedure_breadcrumb_without_sub_renders_text_crumb() {
        let catalog = catalog();
        let procedure = catalog.by_slug("b").unwrap();
        let params = QueryParams::parse("cat=Aesthetic");
        let trail = procedure_breadcrumb(&catalog, procedure, &params).expect("cat present");
        assert_eq!(trail.crumbs[2].label, "Σώμα");
        assert_eq!(trail.crumbs[2].href, None);
    }

    #[test]
    fn procedure_breadcrumb_without_subcategory_ends_at_category() {
        let catalog = catalog();
        let procedure = catalog.by_slug("c").unwrap();
        let params = QueryParams::parse("cat=Reconstructive");
        let trail = procedure_breadcrumb(&catalog, procedure, &params).expect("cat present");
        assert_eq!(labels(&trail), [CATALOG_ROOT_LABEL, "Reconstructive"]);
        assert!(trail.crumbs[1].highlighted);
        assert_eq!(
            trail.crumbs[1].href.as_deref(),
            Some("/catalog?cat=Reconstructive&step=1")
        );
    }
}
