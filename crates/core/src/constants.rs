//! Constants used throughout the clinic core crate.
//!
//! Paths, query keys and the fixed Greek copy used when catalog data has no text of its own.

/// Base path of the procedure catalog.
pub const CATALOG_PATH: &str = "/catalog";

/// Catalog data file, relative to the working directory or a crate ancestor.
pub const CATALOG_FILE: &str = "data/catalog.yaml";

/// Static site content file, relative to the working directory or a crate ancestor.
pub const SITE_FILE: &str = "data/site.yaml";

/// Default static asset directory.
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Default bind address for the site server.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Default site name shown in page titles.
pub const DEFAULT_SITE_NAME: &str = "Art of the Possible";

/// Query key for the selected category label.
pub const QUERY_CATEGORY: &str = "cat";
/// Query key for the selected subcategory slug.
pub const QUERY_SUBCATEGORY: &str = "sub";
/// Query key for the informational wizard step.
pub const QUERY_STEP: &str = "step";
/// Query key for the free-text filter carried through navigation.
pub const QUERY_TEXT: &str = "q";

/// Root breadcrumb label and default listing title.
pub const CATALOG_ROOT_LABEL: &str = "Επεμβάσεις";
/// Default listing description.
pub const CATALOG_DEFAULT_DESCRIPTION: &str =
    "Επιλέξτε κατηγορία και δείτε την επέμβαση που σας ταιριάζει.";
/// Category card description when the category declares none.
pub const CATEGORY_FALLBACK_DESCRIPTION: &str = "Επιλέξτε για να δείτε διαθέσιμες επεμβάσεις.";
/// Subcategory card description when the slug table has no entry.
pub const SUBCATEGORY_FALLBACK_DESCRIPTION: &str =
    "Επιλέξτε για να δείτε τις διαθέσιμες επεμβάσεις.";

/// Contact prompt appended to every procedure page.
pub const CONTACT_TITLE: &str = "Θέλετε να το συζητήσουμε;";
pub const CONTACT_TEXT: &str =
    "Συμπληρώστε τα στοιχεία σας και η ομάδα μας θα επικοινωνήσει μαζί σας.";
pub const CONTACT_LABEL: &str = "Επικοινωνία";
pub const CONTACT_HREF: &str = "/";
