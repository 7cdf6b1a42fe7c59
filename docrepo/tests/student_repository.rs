use docrepo::{
    bson::{Document, doc, oid::ObjectId},
    convert::{extract_persisted_ids, to_documents, to_objects},
    memory::InMemoryStore,
    prelude::*,
};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Student {
    #[serde(rename = "_id", default)]
    pub id: Option<ObjectId>,
    pub firstname: String,
    pub lastname: String,
    pub subjects: Vec<String>,
    #[serde(rename = "class")]
    pub klass: String,
    pub age: i32,
}

impl Student {
    fn new(firstname: &str, lastname: &str, subjects: &[&str], klass: &str, age: i32) -> Self {
        Self {
            id: None,
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            klass: klass.to_string(),
            age,
        }
    }
}

impl DocumentModel for Student {
    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn to_document(&self) -> Document {
        doc! {
            "firstname": self.firstname.clone(),
            "lastname": self.lastname.clone(),
            "subjects": self.subjects.clone(),
            "class": self.klass.clone(),
            "age": self.age,
        }
    }
}

async fn setup() -> (RepositoryContext<InMemoryStore>, Table) {
    let context = RepositoryContext::new(InMemoryStore::builder().build().await.unwrap());
    let students = context.use_table("students");

    (context, students)
}

fn without_identity(mut student: Student) -> Student {
    student.id = None;
    student
}

#[tokio::test]
async fn inserted_record_is_found_by_equality() {
    let (context, students) = setup().await;
    let josh = Student::new("Josh", "Pitt", &["Physics"], "JSS 3", 28);

    let response = context.insert(&students, &josh).await;
    assert!(response.succeeded());
    assert_eq!(response.message(), "");

    let found = context
        .get_all_with_filter::<Student>(&students, &Filter::eq("firstname", "Josh"))
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert!(found[0].id.is_some());
    assert_eq!(without_identity(found[0].clone()), josh);
}

#[tokio::test]
async fn insert_many_then_contains_filter() {
    let (context, students) = setup().await;
    let lauras = [
        Student::new("Laura 1", "Gomez", &["Maths"], "SS 1", 15),
        Student::new("Laura 2", "Gomez", &["Maths"], "SS 1", 15),
        Student::new("Laura 3", "Gomez", &["Maths"], "SS 1", 15),
    ];

    let batch = context.insert_many(&students, &lauras).await;
    assert!(batch.succeeded());
    assert_eq!(batch.attempted(), 3);

    let found = context
        .get_all_with_filter::<Student>(&students, &Filter::contains("firstname", "Laura"))
        .await
        .unwrap();

    assert_eq!(found.len(), 3);
}

#[tokio::test]
async fn insert_many_returns_exactly_the_batch() {
    let (context, students) = setup().await;
    context
        .insert(&students, &Student::new("Outsider", "X", &[], "JSS 1", 11))
        .await;

    let batch = [
        Student::new("Ada", "Lovelace", &["Maths"], "SS 3", 17),
        Student::new("Alan", "Turing", &["Maths", "Logic"], "SS 3", 17),
    ];
    assert!(context.insert_many(&students, &batch).await.succeeded());

    let mut found: Vec<Student> = context
        .get_all_with_filter::<Student>(&students, &Filter::eq("class", "SS 3"))
        .await
        .unwrap()
        .into_iter()
        .map(without_identity)
        .collect();
    found.sort_by(|a, b| a.firstname.cmp(&b.firstname));

    assert_eq!(found, batch.to_vec());
}

#[tokio::test]
async fn delete_many_removes_the_filtered_records() {
    let (context, students) = setup().await;
    context
        .insert_many(
            &students,
            &[
                Student::new("Kim", "Lee", &[], "JSS 2", 13),
                Student::new("Tom", "Lee", &[], "JSS 2", 13),
                Student::new("Ana", "Diaz", &[], "JSS 1", 12),
            ],
        )
        .await;

    let filter = Filter::eq("class", "JSS 2");
    let found = context.get_all_with_filter::<Student>(&students, &filter).await.unwrap();
    let ids = extract_persisted_ids(&found);
    assert_eq!(ids.len(), 2);

    let batch = context.delete_many(&students, &ids).await;
    assert!(batch.succeeded());

    assert!(context.get_all_with_filter::<Student>(&students, &filter).await.unwrap().is_empty());
    assert_eq!(context.get_all::<Student>(&students).await.unwrap().len(), 1);
}

#[tokio::test]
async fn insert_of_persisted_record_gets_a_fresh_identity() {
    let (context, students) = setup().await;
    context
        .insert(&students, &Student::new("Josh", "Pitt", &[], "JSS 3", 28))
        .await;
    let first = context.get_all::<Student>(&students).await.unwrap().remove(0);

    assert!(context.insert(&students, &first).await.succeeded());

    let all = context.get_all::<Student>(&students).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_ne!(all[0].id, all[1].id);
    assert_eq!(without_identity(all[1].clone()), without_identity(first));
}

#[tokio::test]
async fn update_of_unknown_identity_changes_nothing() {
    let (context, students) = setup().await;
    context
        .insert(&students, &Student::new("Josh", "Pitt", &[], "JSS 3", 28))
        .await;
    let before = context.get_all::<Student>(&students).await.unwrap();

    let mut ghost = Student::new("Ghost", "Nobody", &[], "-", 0);
    ghost.id = Some(ObjectId::new());

    assert!(context.update(&students, &ghost).await.succeeded());
    assert_eq!(context.get_all::<Student>(&students).await.unwrap(), before);
}

#[tokio::test]
async fn save_without_identity_behaves_like_insert() {
    let (via_save, saved) = setup().await;
    let (via_insert, inserted) = setup().await;
    let student = Student::new("Mia", "Rossi", &["Art"], "JSS 1", 12);

    let save_response = via_save.save(&saved, &student).await;
    let insert_response = via_insert.insert(&inserted, &student).await;
    assert_eq!(save_response, insert_response);

    let from_save = via_save.get_all::<Student>(&saved).await.unwrap();
    let from_insert = via_insert.get_all::<Student>(&inserted).await.unwrap();
    assert_eq!(from_save.len(), 1);
    assert_eq!(
        from_save.into_iter().map(without_identity).collect::<Vec<_>>(),
        from_insert.into_iter().map(without_identity).collect::<Vec<_>>(),
    );
}

#[tokio::test]
async fn save_with_identity_behaves_like_update() {
    let (context, students) = setup().await;
    context
        .insert_many(
            &students,
            &[
                Student::new("Leo", "Park", &["Music"], "SS 2", 16),
                Student::new("Zoe", "Park", &["Music"], "SS 2", 16),
            ],
        )
        .await;
    let stored = context.get_all::<Student>(&students).await.unwrap();

    let mut via_save = stored[0].clone();
    via_save.age = 17;
    let mut via_update = stored[1].clone();
    via_update.age = 17;

    assert_eq!(
        context.save(&students, &via_save).await,
        context.update(&students, &via_update).await,
    );
    assert_eq!(context.get_all::<Student>(&students).await.unwrap(), vec![via_save, via_update]);
}

#[tokio::test]
async fn edited_record_saves_in_place() {
    let (context, students) = setup().await;
    context
        .save(&students, &Student::new("Josh", "Pitt", &["Physics"], "JSS 3", 28))
        .await;

    let mut josh = context
        .get_all_with_filter::<Student>(&students, &Filter::eq("firstname", "Josh"))
        .await
        .unwrap()
        .remove(0);
    josh.lastname = "Brad".to_string();
    josh.subjects.push("Chemistry".to_string());

    assert!(context.save(&students, &josh).await.succeeded());

    let all = context.get_all::<Student>(&students).await.unwrap();
    assert_eq!(all, vec![josh]);
}

#[tokio::test]
async fn stored_documents_map_back_to_equal_records() {
    let (context, students) = setup().await;
    let original = Student::new("Ines", "Alvarez", &["Biology", "Chemistry"], "SS 2", 16);
    context.insert(&students, &original).await;

    let stored = context.get_all::<Student>(&students).await.unwrap();
    assert!(stored[0].id.is_some());

    let restored: Vec<Student> = to_objects(to_documents(&stored).unwrap()).unwrap();
    assert_eq!(restored, stored);
}

#[tokio::test]
async fn filters_compose() {
    let (context, students) = setup().await;
    context
        .insert_many(
            &students,
            &[
                Student::new("Laura 1", "Gomez", &["Physics"], "SS 1", 15),
                Student::new("Laura 2", "Gomez", &["Physics", "Chemistry"], "SS 2", 16),
                Student::new("Paco", "Gomez", &["Chemistry"], "SS 2", 16),
            ],
        )
        .await;

    let laura_in_ss2 = Filter::contains("firstname", "Laura").and(Filter::eq("class", "SS 2"));
    let found = context.get_all_with_filter::<Student>(&students, &laura_in_ss2).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].firstname, "Laura 2");

    let takes_physics = Filter::eq("subjects", "Physics");
    assert_eq!(context.get_all_with_filter::<Student>(&students, &takes_physics).await.unwrap().len(), 2);

    let not_gomez = Filter::ne("lastname", "Gomez");
    assert!(context.get_all_with_filter::<Student>(&students, &not_gomez).await.unwrap().is_empty());
}

#[tokio::test]
async fn tables_are_independent_and_case_sensitive() {
    let (context, students) = setup().await;
    let shouting = context.use_table("STUDENTS");

    context
        .insert(&students, &Student::new("Josh", "Pitt", &[], "JSS 3", 28))
        .await;

    assert_eq!(context.get_all::<Student>(&students).await.unwrap().len(), 1);
    assert!(context.get_all::<Student>(&shouting).await.unwrap().is_empty());
    assert!(context.get_all::<Student>(&context.use_table("missing")).await.unwrap().is_empty());

    context.shutdown().await.unwrap();
}
