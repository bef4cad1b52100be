use camino::Utf8PathBuf;

use tracefish_document_manager::config::ResolvedConfig;
use tracefish_document_manager::domain::DirectoryKind;
use tracefish_document_manager::storage::Store;

fn config_with_roots() -> ResolvedConfig {
    ResolvedConfig {
        api_base_url: "https://api.tracefish.example/v1".to_string(),
        token_env: "TRACEFISH_TOKEN".to_string(),
        documents_dir: Some(Utf8PathBuf::from("/data/tracefish/documents")),
        cache_dir: Some(Utf8PathBuf::from("/data/tracefish/cache")),
        downloads_dir: Some(Utf8PathBuf::from("/home/agent/Downloads")),
    }
}

#[test]
fn resolve_orders_candidates_app_private_first() {
    let store = Store::resolve(&config_with_roots()).unwrap();
    let kinds: Vec<_> = store.candidates().iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DirectoryKind::AppDocuments,
            DirectoryKind::AppCache,
            DirectoryKind::Downloads
        ]
    );
}

#[test]
fn only_the_downloads_candidate_needs_permission() {
    let store = Store::resolve(&config_with_roots()).unwrap();
    let flags: Vec<_> = store
        .candidates()
        .iter()
        .map(|c| (c.kind, c.requires_permission))
        .collect();
    assert_eq!(
        flags,
        vec![
            (DirectoryKind::AppDocuments, false),
            (DirectoryKind::AppCache, false),
            (DirectoryKind::Downloads, true)
        ]
    );
}

#[test]
fn artifact_path_lands_under_the_candidate_root() {
    let store = Store::resolve(&config_with_roots()).unwrap();
    let path = Store::artifact_path(&store.candidates()[0], "traceability-X-1.pdf");
    assert_eq!(
        path,
        Utf8PathBuf::from("/data/tracefish/documents/traceability-X-1.pdf")
    );
}
