use super::*;
use crate::fs::MemoryFs;
use crate::processor::{Processor, ProcessorRegistry, TEMPLATE_TAG, TemplateProcessor};

/// Appends `<tag>` so the application order is visible in the output.
struct Mark;

impl Processor for Mark {
    fn process(&self, _: &ProcessContext<'_>, content: &str, tag: &str) -> anyhow::Result<String> {
        Ok(format!("{content}<{tag}>"))
    }
}

fn registry() -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new();
    registry
        .register("a", Mark)
        .unwrap()
        .register("b", Mark)
        .unwrap()
        .register(TEMPLATE_TAG, TemplateProcessor)
        .unwrap();
    registry
}

fn store_with(fs: Arc<MemoryFs>, config: EngineConfig) -> AssetStore {
    let mut store = AssetStore::new(fs, Arc::new(registry()), config);
    store.search_path("/project/assets").unwrap();
    store
}

fn store(fs: Arc<MemoryFs>) -> AssetStore {
    store_with(fs, EngineConfig::default())
}

#[test]
fn test_lookup_strips_directives() {
    let fs = Arc::new(MemoryFs::new());
    fs.file("/project/assets/b.js", "//= require c\n//= require c\n\nsource of b\n");

    let asset = store(fs).lookup("b.js").unwrap();
    assert_eq!(asset.content(), "source of b\n");
    assert_eq!(asset.dependencies(), ["c.js", "c.js"]);
    assert_eq!(asset.path(), Path::new("/project/assets/b.js"));
    assert_eq!(asset.source().name, "b.js");
}

#[test]
fn test_extension_inherited_from_referencing_asset() {
    let fs = Arc::new(MemoryFs::new());
    fs.file(
        "/project/assets/app.css.a",
        "//= require reset\n//= require theme.less\nbody {}\n",
    );

    let asset = store(fs).lookup("app.css").unwrap();
    assert_eq!(asset.dependencies(), ["reset.css", "theme.less"]);
}

#[test]
fn test_wildcard_expands_to_directory_files() {
    let fs = Arc::new(MemoryFs::new());
    fs.file("/project/assets/main.js", "//= require foo\n//= require assets/*\n//= require baz\n")
        .file("/project/assets/assets/2", "")
        .file("/project/assets/assets/1", "")
        .file("/project/assets/assets/nested/3", "");

    let asset = store(fs).lookup("main.js").unwrap();
    assert_eq!(
        asset.dependencies(),
        ["foo.js", "assets/1", "assets/2", "baz.js"]
    );
}

#[test]
fn test_wildcard_on_missing_directory() {
    let fs = Arc::new(MemoryFs::new());
    fs.file("/project/assets/main.js", "//= require vendor/*\n");

    let err = store(fs).lookup("main.js").unwrap_err();
    assert!(matches!(err, AssetError::AssetNotFound { path, .. } if path == "vendor/*"));
}

#[test]
fn test_filters_apply_innermost_first() {
    let fs = Arc::new(MemoryFs::new());
    fs.file("/project/assets/x.js.a.b", "src");

    let asset = store(fs).lookup("x.js").unwrap();
    assert_eq!(asset.content(), "src<b><a>");
}

#[test]
fn test_exact_match_with_filter_suffix_is_processed() {
    let fs = Arc::new(MemoryFs::new());
    fs.file("/project/assets/x.js.a", "src");

    let asset = store(fs).lookup("x.js.a").unwrap();
    assert_eq!(asset.content(), "src<a>");
}

#[test]
fn test_unknown_filter() {
    let fs = Arc::new(MemoryFs::new());
    fs.file("/project/assets/style.css.scss", "a {}");

    let err = store(fs).lookup("style.css").unwrap_err();
    assert!(matches!(err, AssetError::UnknownFilter(tag) if tag == "scss"));
}

#[test]
fn test_lookup_is_memoized() {
    let fs = Arc::new(MemoryFs::new());
    fs.file("/project/assets/d.js", "first\n");
    let store = store(Arc::clone(&fs));

    let first = store.lookup("d.js").unwrap();
    fs.file("/project/assets/d.js", "second\n");
    let second = store.lookup("d.js").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.content(), "first\n");
    assert!(store.cached("d.js").is_some());
    assert!(store.cached("e.js").is_none());
}

#[test]
fn test_dependency_spellings_share_one_key() {
    let fs = Arc::new(MemoryFs::new());
    fs.file(
        "/project/assets/a.js",
        "//= require /b\n//= require b\n//= require ./b\n//= require lib/../b.js\n",
    )
    .file("/project/assets/b.js", "source of b\n");
    let store = store(fs);

    let asset = store.lookup("a.js").unwrap();
    assert_eq!(asset.dependencies(), ["b.js", "b.js", "b.js", "b.js"]);

    let b = store.lookup("/b.js").unwrap();
    assert!(Arc::ptr_eq(&b, &store.lookup("./b.js").unwrap()));
    assert!(Arc::ptr_eq(&b, &store.cached("b.js").unwrap()));
}

fn assert_sync<T: Send + Sync>() {}

#[test]
fn test_concurrent_lookups_share_first_insert() {
    assert_sync::<AssetStore>();

    let fs = Arc::new(MemoryFs::new());
    fs.file("/project/assets/x.js.a.b", "src");
    let store = store(fs);

    let assets: Vec<Arc<Asset>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(|| store.lookup("x.js").unwrap())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let cached = store.cached("x.js").unwrap();
    assert_eq!(cached.content(), "src<b><a>");
    for asset in &assets {
        assert!(Arc::ptr_eq(asset, &cached));
    }
}

#[test]
fn test_failed_lookup_is_not_cached() {
    let fs = Arc::new(MemoryFs::new());
    let store = store(Arc::clone(&fs));

    assert!(store.lookup("late.js").is_err());
    fs.file("/project/assets/late.js", "now here\n");
    assert_eq!(store.lookup("late.js").unwrap().content(), "now here\n");
}

#[test]
fn test_no_search_path_and_missing_extension() {
    let fs = Arc::new(MemoryFs::new());
    fs.file("/project/assets/a.js", "");
    let bare = AssetStore::new(
        fs.clone(),
        Arc::new(ProcessorRegistry::new()),
        EngineConfig::default(),
    );
    assert!(matches!(
        bare.lookup("a.js").unwrap_err(),
        AssetError::NoSearchPathConfigured
    ));

    assert!(matches!(
        store(fs).lookup("a").unwrap_err(),
        AssetError::MissingExtension(_)
    ));
}

#[test]
fn test_search_path_is_normalized() {
    let mut store = AssetStore::new(
        Arc::new(MemoryFs::new()),
        Arc::new(ProcessorRegistry::new()),
        EngineConfig::default(),
    );
    store
        .search_path("/project/./assets/../assets")
        .unwrap()
        .search_path("relative")
        .unwrap();

    assert_eq!(store.search_paths()[0], PathBuf::from("/project/assets"));
    assert!(store.search_paths()[1].is_absolute());
}

#[test]
fn test_invalid_utf8_is_io_error() {
    let fs = Arc::new(MemoryFs::new());
    fs.file("/project/assets/bin.js", vec![0xff, 0xfe]);

    let err = store(fs).lookup("bin.js").unwrap_err();
    assert!(matches!(err, AssetError::Io(..)));
}

#[test]
fn test_fingerprinting_only_changes_urls() {
    let template = "//= require f\nload('{{ url(path=\"logo.png\") }}');\n";
    let fs = Arc::new(MemoryFs::new());
    fs.file("/project/assets/e.js.tmpl", template)
        .file("/project/assets/logo.png", "png");

    let plain = store(Arc::clone(&fs)).lookup("e.js").unwrap();
    assert_eq!(plain.content(), "load('/assets/logo.png');\n");

    let fingerprinted = store_with(
        fs,
        EngineConfig {
            fingerprint: true,
            ..EngineConfig::default()
        },
    );
    let asset = fingerprinted.lookup("e.js").unwrap();
    let url = fingerprinted.asset_url("logo.png").unwrap();

    assert_ne!(url, "/assets/logo.png");
    assert_eq!(fingerprinted.asset_url("./img/../logo.png").unwrap(), url);
    assert_eq!(asset.content(), format!("load('{url}');\n"));
    assert_eq!(asset.dependencies(), plain.dependencies());
}

#[test]
fn test_template_reference_to_missing_file() {
    let fs = Arc::new(MemoryFs::new());
    fs.file("/project/assets/e.js.tmpl", "{{ url(path=\"gone.png\") }}");

    let err = store(fs).lookup("e.js").unwrap_err();
    assert!(matches!(err, AssetError::ProcessorFailure { ref tag, .. } if tag == "tmpl"));
}
