//! Integration tests for TreeService over an in-memory filesystem.

use std::path::Path;
use std::sync::Arc;

use comptree::application::services::{TreeQuery, TreeService};
use comptree::application::ApplicationError;
use comptree::config::Settings;
use comptree::domain::{CountPolicy, OptionalBox, TreeBuilder};
use comptree::infrastructure::di::ServiceContainer;
use comptree::infrastructure::traits::{FileSystem, MemoryFileSystem, RealFileSystem};
use rstest::{fixture, rstest};
use tempfile::TempDir;

const DOC: &str = r#"
[[children]]
value = 1

[[children]]
value = 4
children = []

[[children]]
children = [{ value = 6 }, { value = 9 }]
"#;

#[fixture]
fn service() -> TreeService {
    comptree::util::testing::init_test_setup();
    let fs = MemoryFileSystem::new().with_file("/trees/doc.toml", DOC);
    TreeService::new(Arc::new(fs), CountPolicy::LeafOnly)
}

#[rstest]
fn given_document_when_walking_then_pre_order_values(service: TreeService) {
    let tree = service.load(Path::new("/trees/doc.toml")).unwrap();
    assert_eq!(service.walk(&tree, false), vec![1, 4, 6, 9]);
    assert_eq!(service.walk(&tree, true), vec![1, 6, 9]);
}

#[rstest]
#[case(CountPolicy::LeafOnly, 1, 3)]
#[case(CountPolicy::SelfCountsIfChildless, 2, 4)]
fn given_queries_when_counting_then_policy_respected(
    service: TreeService,
    #[case] policy: CountPolicy,
    #[case] even: usize,
    #[case] all: usize,
) {
    // 4 is a childless composite, 6 a leaf; 1 and 9 are odd leaves
    let service = service.with_policy(policy);
    let tree = service.load(Path::new("/trees/doc.toml")).unwrap();
    let query = TreeQuery {
        even: true,
        ..TreeQuery::default()
    };
    assert_eq!(service.count(&tree, &query), even);
    assert_eq!(service.count(&tree, &TreeQuery::default()), all);
}

#[rstest]
fn given_bounds_when_searching_first_then_first_in_order(service: TreeService) {
    let tree = service.load(Path::new("/trees/doc.toml")).unwrap();
    let query = TreeQuery {
        min: Some(5),
        ..TreeQuery::default()
    };
    assert_eq!(service.first(&tree, &query), OptionalBox::of(6));
    let none = TreeQuery {
        min: Some(100),
        ..TreeQuery::default()
    };
    assert_eq!(service.first(&tree, &none), OptionalBox::empty());
}

#[rstest]
#[case(1, 16)]
#[case(3, 48)]
#[case(0, 0)]
fn given_scale_when_summing_then_leaves_scaled(
    service: TreeService,
    #[case] scale: i64,
    #[case] expected: i64,
) {
    let tree = service.load(Path::new("/trees/doc.toml")).unwrap();
    assert_eq!(service.sum(&tree, scale).unwrap(), expected);
}

#[rstest]
fn given_leaf_near_i64_limit_when_scaling_then_overflow_instead_of_wrap(service: TreeService) {
    // 2^62 * 4 does not fit into i64
    let tree = comptree::application::TreeDocument::parse(
        "[[children]]\nvalue = 4611686018427387904\n",
    )
    .unwrap();
    let err = service.sum(&tree, 4).unwrap_err();
    assert!(matches!(err, ApplicationError::Overflow { .. }));
}

#[rstest]
fn given_sum_exceeding_limit_when_adding_then_overflow(service: TreeService) {
    let tree = comptree::application::TreeDocument::parse(
        "[[children]]\nvalue = 9223372036854775807\n[[children]]\nvalue = 1\n",
    )
    .unwrap();
    assert!(service.sum(&tree, 1).is_err());
}

#[rstest]
fn given_missing_file_when_loading_then_operation_failed_with_path(service: TreeService) {
    let err = service.load(Path::new("/trees/missing.toml")).unwrap_err();
    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("/trees/missing.toml"));
}

#[test]
fn given_built_tree_when_saved_to_disk_then_loads_back() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("built.toml");
    let service = TreeService::new(Arc::new(RealFileSystem), CountPolicy::LeafOnly);
    let tree = TreeBuilder::new()
        .open_with(10)
        .leaf(20)
        .close()
        .leaf(30)
        .build()
        .unwrap();

    service.save(&path, &tree).unwrap();

    assert!(RealFileSystem.exists(&path));
    assert_eq!(service.load(&path).unwrap(), tree);
}

#[test]
fn given_container_with_settings_when_wired_then_service_uses_policy() {
    let mut settings = Settings::default();
    settings.traversal.policy = CountPolicy::SelfCountsIfChildless;
    let container = ServiceContainer::with_deps(settings, Arc::new(MemoryFileSystem::new()));
    assert_eq!(container.trees.policy(), CountPolicy::SelfCountsIfChildless);
    assert!(!container.fs.exists(Path::new("/anything")));
}
