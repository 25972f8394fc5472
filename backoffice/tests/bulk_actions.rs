//! Bulk action flows for the post listing over the public crate surface.

use std::sync::Arc;

use backoffice::domain::ports::{EntityGateway, FixtureGateway, RecordingNotifier, ToastVariant};
use backoffice::domain::{
    AdminRecord, BlogPost, BulkAction, BulkActionExecutor, EntityId, EntityStore, FilterPredicate,
    ListingController, PostDraft, PostPatch, PostStatus, Slug, Title,
};

fn draft(title: &str, categories: &[&str]) -> PostDraft {
    let title = Title::new(title).expect("valid title");
    let slug = Slug::from_title(&title).expect("derivable slug");
    PostDraft {
        title,
        slug,
        excerpt: "teaser".to_owned(),
        category_ids: categories
            .iter()
            .map(|raw| EntityId::new(*raw).expect("valid id"))
            .collect(),
    }
}

struct Screen {
    store: EntityStore<BlogPost, FixtureGateway<BlogPost>>,
    listing: ListingController,
    executor: BulkActionExecutor,
    notifier: Arc<RecordingNotifier>,
}

async fn screen(drafts: Vec<PostDraft>) -> Screen {
    let gateway = Arc::new(FixtureGateway::new(
        BlogPost::from_draft,
        BlogPost::apply_patch,
    ));
    for draft in &drafts {
        gateway.insert(draft).await.expect("seed insert");
    }
    let notifier = Arc::new(RecordingNotifier::new());
    let mut store = EntityStore::new(gateway, notifier.clone());
    store.load().await.expect("initial load");
    Screen {
        store,
        listing: ListingController::new(),
        executor: BulkActionExecutor::new(notifier.clone()),
        notifier,
    }
}

#[tokio::test]
async fn publishing_a_filtered_selection_touches_only_that_category() {
    let mut screen = screen(vec![
        draft("Branding refresh", &["design"]),
        draft("Design tokens", &["design"]),
        draft("Quarterly numbers", &["finance"]),
    ])
    .await;

    screen
        .listing
        .set_filter(FilterPredicate::all().with_facet("category", "design"));
    screen.listing.select_all_visible(screen.store.collection());
    assert_eq!(screen.listing.selected_count(), 2);

    let report = screen
        .executor
        .execute(
            &mut screen.store,
            &mut screen.listing,
            BulkAction::Update(PostPatch::status(PostStatus::Published)),
        )
        .await;

    assert!(report.is_clean());
    let published: Vec<PostStatus> = screen
        .store
        .collection()
        .iter()
        .map(BlogPost::status)
        .collect();
    assert_eq!(
        published
            .iter()
            .filter(|s| **s == PostStatus::Published)
            .count(),
        2,
        "only the filtered posts were published"
    );
    assert_eq!(screen.listing.selected_count(), 0);
}

#[tokio::test]
async fn bulk_delete_raises_one_toast_and_clears_the_selection() {
    let mut screen = screen(vec![
        draft("First", &[]),
        draft("Second", &[]),
        draft("Third", &[]),
    ])
    .await;
    screen.listing.select_all_visible(screen.store.collection());
    let toasts_before = screen.notifier.count();

    let report = screen
        .executor
        .execute(&mut screen.store, &mut screen.listing, BulkAction::Delete)
        .await;

    assert_eq!(report.success_count, 3);
    assert!(screen.store.collection().is_empty());
    assert_eq!(screen.listing.selected_count(), 0);
    assert_eq!(screen.notifier.count(), toasts_before + 1);
    let toast = screen.notifier.seen().pop().expect("toast");
    assert_eq!(toast.variant, ToastVariant::Success);
}

#[tokio::test]
async fn export_reflects_the_selection_at_the_moment_of_export() {
    let mut screen = screen(vec![
        draft("Keep me", &["design"]),
        draft("Skip me", &["finance"]),
    ])
    .await;
    let keep = screen
        .store
        .collection()
        .iter()
        .find(|p| p.title().as_ref() == "Keep me")
        .expect("seeded post")
        .id()
        .clone();
    screen.listing.toggle_select(keep);

    let json = screen
        .executor
        .export_selected(&screen.store, &screen.listing)
        .expect("export succeeds");
    let rows: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    let exported = rows.as_array().expect("array export");
    assert_eq!(exported.len(), 1);
    assert_eq!(
        exported
            .first()
            .and_then(|row| row.get("title"))
            .and_then(|title| title.as_str()),
        Some("Keep me")
    );
}
