use anyhow::Result;
use tempfile::{tempdir, TempDir};
use uni_schedule_bot::database::{connection::DatabaseManager, models::*};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn student(user_id: i64, group: &str) -> User {
    User::new(
        user_id,
        "Иван Петров",
        Some("ivan".to_string()),
        "Механический факультет",
        2,
        group,
    )
}

#[tokio::test]
async fn test_user_registration_and_retrieval() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    student(12345, "МТ-21").upsert(&db.pool).await?;

    let found = User::find(&db.pool, 12345).await?;
    assert!(found.is_some());
    let found = found.unwrap();
    assert_eq!(found.full_name, "Иван Петров");
    assert_eq!(found.username.as_deref(), Some("ivan"));
    assert_eq!(found.faculty, "Механический факультет");
    assert_eq!(found.course(), 2);
    assert_eq!(found.user_group, "МТ-21");

    Ok(())
}

#[tokio::test]
async fn test_user_not_found() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let result = User::find(&db.pool, 99999).await?;
    assert!(result.is_none());

    Ok(())
}

#[tokio::test]
async fn test_reregistration_replaces_previous_choice() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    student(1, "МТ-21").upsert(&db.pool).await?;
    User::new(1, "Иван Петров", None, "ДиА", 3, "ДиА-31")
        .upsert(&db.pool)
        .await?;

    assert_eq!(User::count(&db.pool).await?, 1);
    let found = User::find(&db.pool, 1).await?.unwrap();
    assert_eq!(found.faculty, "ДиА");
    assert_eq!(found.course(), 3);
    assert_eq!(found.user_group, "ДиА-31");
    assert!(found.username.is_none());

    Ok(())
}

#[tokio::test]
async fn test_user_removal() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    student(7, "МТ-21").upsert(&db.pool).await?;

    assert!(User::remove(&db.pool, 7).await?);
    assert!(User::find(&db.pool, 7).await?.is_none());

    // second removal has nothing to delete
    assert!(!User::remove(&db.pool, 7).await?);

    Ok(())
}

#[tokio::test]
async fn test_list_and_count_users() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    assert_eq!(User::count(&db.pool).await?, 0);
    assert!(User::all(&db.pool).await?.is_empty());

    for (id, group) in [(1, "МТ-21"), (2, "МТ-22"), (3, "МТ-21")] {
        student(id, group).upsert(&db.pool).await?;
    }

    assert_eq!(User::count(&db.pool).await?, 3);
    let users = User::all(&db.pool).await?;
    let mut ids: Vec<i64> = users.iter().map(|u| u.user_id).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3]);

    Ok(())
}

#[tokio::test]
async fn test_course_outside_range_is_rejected_by_schema() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let mut user = student(5, "МТ-21");
    user.course = 9;
    assert!(user.upsert(&db.pool).await.is_err());
    assert_eq!(User::count(&db.pool).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_database_ping() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    db.ping().await?;
    Ok(())
}
