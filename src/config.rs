use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

const DEFAULT_CSV_PATH: &str = "dailydata.csv";
const DEFAULT_POSTS_DIRECTORY: &str = "posts";
const DEFAULT_SITEMAP_PATH: &str = "sitemap.xml";
const DEFAULT_STATE_PATH: &str = "lastProcessed.json";
const DEFAULT_SITE_ORIGIN: &str = "https://thedailydata.org/";
const DEFAULT_SITE_TITLE: &str = "The DailyDATA";

/// The optional on-disk project file (`almanac.yaml`). Every field has a
/// default, so an empty file is equivalent to no file at all.
#[derive(Deserialize)]
struct Project {
    #[serde(default)]
    pub csv_path: Option<PathBuf>,

    #[serde(default)]
    pub posts_directory: Option<PathBuf>,

    #[serde(default)]
    pub sitemap_path: Option<PathBuf>,

    #[serde(default)]
    pub state_path: Option<PathBuf>,

    #[serde(default)]
    pub change_detection: Option<bool>,

    #[serde(default)]
    pub site_origin: Option<Url>,

    #[serde(default)]
    pub site_title: Option<String>,
}

/// Bundled configuration for a site build. All paths and site constants flow
/// through here so the pipeline can be pointed at fixture data in tests.
pub struct Config {
    /// Path to the source CSV. Must exist; a missing CSV aborts the build.
    pub csv_path: PathBuf,

    /// Directory receiving one `{date}.html` file per CSV row. Created if
    /// absent.
    pub posts_directory: PathBuf,

    /// Path of the sitemap XML file, rewritten on every run.
    pub sitemap_path: PathBuf,

    /// Path of the JSON run-state file. Only read or written when
    /// `change_detection` is enabled.
    pub state_path: PathBuf,

    /// When enabled, post files whose rendered content hash matches the
    /// recorded hash are not rewritten, and run state is persisted at the
    /// end of the build.
    pub change_detection: bool,

    /// The site's origin URL. Sitemap `<loc>` values are formed under it.
    pub site_origin: Url,

    /// The site title, used in the page header and as the `<title>` fallback
    /// for rows without a `title` field.
    pub site_title: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            posts_directory: PathBuf::from(DEFAULT_POSTS_DIRECTORY),
            sitemap_path: PathBuf::from(DEFAULT_SITEMAP_PATH),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            change_detection: true,
            // Parsing a constant literal cannot fail.
            site_origin: Url::parse(DEFAULT_SITE_ORIGIN).unwrap(),
            site_title: String::from(DEFAULT_SITE_TITLE),
        }
    }
}

impl Config {
    /// Loads configuration from the project directory. If `almanac.yaml`
    /// exists there it is parsed and its fields override the defaults;
    /// otherwise the defaults are used as-is. Relative paths in the project
    /// file are resolved against the project directory.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join("almanac.yaml");
        if path.exists() {
            Config::from_project_file(&path)
        } else {
            let defaults = Config::default();
            Ok(Config {
                csv_path: dir.join(&defaults.csv_path),
                posts_directory: dir.join(&defaults.posts_directory),
                sitemap_path: dir.join(&defaults.sitemap_path),
                state_path: dir.join(&defaults.state_path),
                change_detection: defaults.change_detection,
                site_origin: defaults.site_origin,
                site_title: defaults.site_title,
            })
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = std::fs::File::open(path)
            .map_err(|e| anyhow!("Opening project file `{}`: {}", path.display(), e))?;
        let project: Project = serde_yaml::from_reader(file)
            .map_err(|e| anyhow!("Parsing project file `{}`: {}", path.display(), e))?;
        let project_root = path
            .parent()
            .ok_or_else(|| anyhow!("Can't get parent directory for `{}`", path.display()))?;
        let defaults = Config::default();
        let resolve = |override_path: Option<PathBuf>, default: PathBuf| match override_path {
            Some(p) => project_root.join(p),
            None => project_root.join(default),
        };
        Ok(Config {
            csv_path: resolve(project.csv_path, defaults.csv_path),
            posts_directory: resolve(project.posts_directory, defaults.posts_directory),
            sitemap_path: resolve(project.sitemap_path, defaults.sitemap_path),
            state_path: resolve(project.state_path, defaults.state_path),
            change_detection: project
                .change_detection
                .unwrap_or(defaults.change_detection),
            site_origin: project.site_origin.unwrap_or(defaults.site_origin),
            site_title: project.site_title.unwrap_or(defaults.site_title),
        })
    }
}
