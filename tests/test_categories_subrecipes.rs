use mockito::Matcher;
use recipe_client::{
    ApiClient, Category, CategoryResource, ClientError, ListController, ListState, Removal,
    Subrecipe, SubrecipeForm, SubrecipeResource,
};
use serde_json::json;

fn yes(_: &str) -> bool {
    true
}

#[tokio::test]
async fn test_categories_add_and_delete() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/categories")
        .with_status(200)
        .with_body(r#"["dinner", "lunch"]"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/categories")
        .match_body(Matcher::Json(json!({"name": "brunch"})))
        .with_status(200)
        .with_body(r#"{"message": "created"}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/categories/lunch")
        .with_status(200)
        .with_body(r#"{"message": "deleted"}"#)
        .create_async()
        .await;

    let mut list = ListController::new(CategoryResource::new(ApiClient::new(server.url())));
    list.load().await;

    let added = list.add(Category::new("brunch")).await.unwrap();
    assert_eq!(added.name(), "brunch");

    let prompts = std::cell::RefCell::new(Vec::new());
    let confirm = |p: &str| {
        prompts.borrow_mut().push(p.to_string());
        true
    };
    assert_eq!(list.remove("lunch", &confirm).await.unwrap(), Removal::Removed);
    assert_eq!(*prompts.borrow(), vec!["Delete category 'lunch'?"]);

    let names: Vec<&str> = list.items().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["dinner", "brunch"]);
    create.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_failed_category_create_keeps_list() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/categories")
        .with_status(200)
        .with_body(r#"["dinner"]"#)
        .create_async()
        .await;
    let _create = server
        .mock("POST", "/categories")
        .with_status(409)
        .create_async()
        .await;

    let mut list = ListController::new(CategoryResource::new(ApiClient::new(server.url())));
    list.load().await;

    let err = list.add(Category::new("dinner")).await.unwrap_err();
    assert_eq!(err.to_string(), "POST /categories: Conflict");
    assert_eq!(list.items(), &[Category::new("dinner")]);
    assert_eq!(list.notice(), Some("POST /categories: Conflict"));
}

#[tokio::test]
async fn test_categories_cannot_be_replaced() {
    let server = mockito::Server::new_async().await;
    let mut list = ListController::new(CategoryResource::new(ApiClient::new(server.url())));

    let err = list
        .replace("dinner", Category::new("supper"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_subrecipe_writes_reload_the_list() {
    let mut server = mockito::Server::new_async().await;
    let initial = server
        .mock("GET", "/subrecipes")
        .with_status(200)
        .with_body(r#"[{"name": "Roux", "ingredients": ["butter", "flour"]}]"#)
        .expect(1)
        .create_async()
        .await;

    let mut list = ListController::new(SubrecipeResource::new(ApiClient::new(server.url())));
    list.load().await;
    initial.assert_async().await;
    initial.remove_async().await;

    let create = server
        .mock("POST", "/subrecipes")
        .match_body(Matcher::Json(json!({
            "name": "Pesto",
            "ingredients": ["basil", "pine nuts"]
        })))
        .with_status(200)
        .with_body(r#"{"name": "Pesto", "ingredients": ["basil", "pine nuts"]}"#)
        .create_async()
        .await;
    let reload = server
        .mock("GET", "/subrecipes")
        .with_status(200)
        .with_body(
            r#"[
                {"name": "Roux", "ingredients": ["butter", "flour"]},
                {"name": "Pesto", "ingredients": ["basil", "pine nuts"]}
            ]"#,
        )
        .expect(1)
        .create_async()
        .await;

    let mut form = SubrecipeForm::new();
    form.name = "Pesto".into();
    form.ingredients.set(0, "basil");
    form.ingredients.push_blank();
    form.ingredients.push_blank();
    form.ingredients.set(2, "pine nuts");

    list.add(form.to_subrecipe().unwrap()).await.unwrap();
    assert_eq!(list.state(), &ListState::Loaded);
    assert_eq!(list.items().len(), 2);
    create.assert_async().await;
    reload.assert_async().await;
}

#[tokio::test]
async fn test_subrecipe_rename_uses_original_name() {
    let mut server = mockito::Server::new_async().await;
    let put = server
        .mock("PUT", "/subrecipes/Roux")
        .match_body(Matcher::Json(json!({
            "name": "Dark roux",
            "ingredients": ["butter", "flour"]
        })))
        .with_status(200)
        .with_body(r#"{"name": "Dark roux", "ingredients": ["butter", "flour"]}"#)
        .create_async()
        .await;
    let _reload = server
        .mock("GET", "/subrecipes")
        .with_status(200)
        .with_body(r#"[{"name": "Dark roux", "ingredients": ["butter", "flour"]}]"#)
        .create_async()
        .await;

    let existing = Subrecipe {
        name: "Roux".into(),
        ingredients: vec!["butter".into(), "flour".into()],
    };
    let mut form = SubrecipeForm::from_existing(&existing);
    form.name = "Dark roux".into();
    form.ingredients.push_blank();

    let mut list = ListController::new(SubrecipeResource::new(ApiClient::new(server.url())));
    let key = form.original_name().unwrap().to_string();
    let updated = list
        .replace(&key, form.to_subrecipe().unwrap())
        .await
        .unwrap();

    assert_eq!(updated.name, "Dark roux");
    assert_eq!(list.items()[0].name, "Dark roux");
    put.assert_async().await;
}

#[tokio::test]
async fn test_subrecipe_delete() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/subrecipes")
        .with_status(200)
        .with_body(r#"[{"name": "Roux"}]"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/subrecipes/Roux")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let mut list = ListController::new(SubrecipeResource::new(ApiClient::new(server.url())));
    list.load().await;
    assert!(list.items()[0].ingredients.is_empty());

    assert_eq!(list.remove("Roux", &yes).await.unwrap(), Removal::Removed);
    assert!(list.items().is_empty());
    delete.assert_async().await;
}
