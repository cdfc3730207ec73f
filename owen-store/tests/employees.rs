mod common;

use chrono::{Months, NaiveDate};

use common::{op, org_graph, text, Fixture, ScriptedProcedures, TENANT};
use owen_core::{Aggregation, BasicEmployeeDetails, LanguageDetails, WorkExperience};
use owen_store::db::{ProcArg, ProcRow, ProcValue, Procedure};
use owen_store::{EmployeeRepo, Lenient, NoMetrics};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn basic_row(first_name: &str, phone: &str) -> ProcRow {
    ProcRow::new()
        .with("emp_int_id", text("E-1042"))
        .with("dob", ProcValue::Date(date(1988, 3, 14)))
        .with("login_id", text("asha@example.com"))
        .with("salutation", text("Ms"))
        .with("first_name", text(first_name))
        .with("last_name", text("Rao"))
        .with("phone_no", text(phone))
        .with("function", text("Sales"))
        .with("zone", text("North"))
        .with("position", text("Manager"))
}

fn experience_row(id: i64, company: &str, from: NaiveDate, to: Option<NaiveDate>) -> ProcRow {
    ProcRow::new()
        .with("work_experience_id", ProcValue::Int(id))
        .with("organization_name", text(company))
        .with("position", text("Analyst"))
        .with("from_date", ProcValue::Date(from))
        .with("to_date", to.map(ProcValue::Date).unwrap_or(ProcValue::Null))
        .with("location", text("Pune"))
}

#[tokio::test]
async fn basic_details_last_row_wins() {
    let procedures = ScriptedProcedures::new();
    procedures.respond(
        Procedure::GetEmployeeBasicDetails,
        vec![basic_row("Asha", "111"), basic_row("Asha", "222")],
    );
    let fx = Fixture::new(org_graph(), procedures);
    let repo = EmployeeRepo::new(&fx.registry);

    let details = repo.basic_details(TENANT, 101).await.unwrap();
    assert_eq!(details.employee_id, 101);
    assert_eq!(details.company_employee_id, "E-1042");
    assert_eq!(details.phone, "222");
    assert_eq!(details.location, "North");
    assert_eq!(details.designation, "Manager");
    assert_eq!(details.dob, Some(date(1988, 3, 14)));

    let call = &fx.procedures().calls_to(Procedure::GetEmployeeBasicDetails)[0];
    assert_eq!(call.params[0].value, ProcArg::Int(101));
}

#[tokio::test]
async fn basic_details_without_rows_is_not_found() {
    let fx = Fixture::new(org_graph(), ScriptedProcedures::new());
    let repo = EmployeeRepo::new(&fx.registry);
    assert!(repo.basic_details(TENANT, 5).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn work_experience_sorted_with_duration() {
    let today = date(2016, 5, 31);
    let open_start = today.checked_sub_months(Months::new(27)).unwrap();
    let procedures = ScriptedProcedures::new();
    procedures.respond(
        Procedure::GetEmployeeWorkExperience,
        vec![
            experience_row(1, "Acme", date(2008, 1, 1), Some(date(2011, 6, 30))),
            experience_row(2, "Globex", open_start, None),
            experience_row(3, "Initech", date(2011, 7, 1), Some(date(2014, 2, 28))),
        ],
    );
    let fx = Fixture::new(org_graph(), procedures);
    let repo = EmployeeRepo::new(&fx.registry);

    let entries = repo.work_experience_at(TENANT, 101, today).await.unwrap();
    let ids: Vec<i64> = entries.iter().map(|e| e.work_experience_id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert_eq!(entries[0].duration, "2years 3months");
    assert_eq!(entries[1].duration, "");
    assert_eq!(entries[2].end_date, Some(date(2011, 6, 30)));
}

#[tokio::test]
async fn education_sorted_by_start_descending() {
    let procedures = ScriptedProcedures::new();
    let row = |id: i64, from: NaiveDate| {
        ProcRow::new()
            .with("education_id", ProcValue::Int(id))
            .with("institute_name", text("IIT"))
            .with("certification", text("B.Tech"))
            .with("from_date", ProcValue::Date(from))
            .with("to_date", ProcValue::Null)
            .with("location", text("Delhi"))
    };
    procedures.respond(
        Procedure::GetEmployeeEducation,
        vec![row(1, date(2002, 7, 1)), row(2, date(2006, 7, 1))],
    );
    let fx = Fixture::new(org_graph(), procedures);
    let repo = EmployeeRepo::new(&fx.registry);

    let entries = repo.education(TENANT, 101).await.unwrap();
    assert_eq!(entries[0].education_id, 2);
    assert_eq!(entries[1].education_id, 1);
    assert_eq!(entries[0].end_date, None);
}

#[tokio::test]
async fn languages_and_master_list() {
    let procedures = ScriptedProcedures::new();
    procedures.respond(
        Procedure::GetEmployeeLanguage,
        vec![ProcRow::new()
            .with("employee_language_id", ProcValue::Int(31))
            .with("language_name", text("Marathi"))
            .with("language_id", ProcValue::Int(4))],
    );
    procedures.respond(
        Procedure::GetLanguageList,
        vec![
            ProcRow::new()
                .with("language_id", ProcValue::Int(4))
                .with("language_name", text("Marathi")),
            ProcRow::new()
                .with("language_id", ProcValue::Int(5))
                .with("language_name", text("Tamil")),
        ],
    );
    let fx = Fixture::new(org_graph(), procedures);
    let repo = EmployeeRepo::new(&fx.registry);

    let languages = repo.languages(TENANT, 101).await.unwrap();
    assert_eq!(
        languages,
        vec![LanguageDetails {
            employee_id: 101,
            language_details_id: 31,
            language_id: 4,
            language_name: "Marathi".into(),
        }]
    );

    let master = repo.language_master(TENANT).await.unwrap();
    assert_eq!(master.len(), 2);
    assert_eq!(master[&5], "Tamil");
    assert!(fx.procedures().calls_to(Procedure::GetLanguageList)[0].params.is_empty());
}

#[tokio::test]
async fn writes_report_the_procedure_flag() {
    let procedures = ScriptedProcedures::new();
    procedures.respond(Procedure::RemoveWorkExperience, op(true));
    procedures.respond(Procedure::RemoveEducation, op(false));
    procedures.respond(Procedure::UpdateEmployeeBasicDetails, op(true));
    procedures.respond(Procedure::InsertWorkExperience, op(true));
    let fx = Fixture::new(org_graph(), procedures);
    let repo = EmployeeRepo::new(&fx.registry);

    assert!(repo.remove_work_experience(TENANT, 12).await.unwrap());
    assert!(!repo.remove_education(TENANT, 13).await.unwrap());
    // unscripted procedure returns no rows
    assert!(!repo.remove_language(TENANT, 14).await.unwrap());

    let details = BasicEmployeeDetails {
        employee_id: 101,
        phone: "98200 00000".into(),
        ..Default::default()
    };
    assert!(repo.update_basic_details(TENANT, &details).await.unwrap());
    let update = &fx.procedures().calls_to(Procedure::UpdateEmployeeBasicDetails)[0];
    assert_eq!(update.arg("empid"), Some(&ProcArg::Int(101)));
    assert_eq!(update.arg("phoneno"), Some(&ProcArg::Text(Some("98200 00000".into()))));

    let entry = WorkExperience {
        employee_id: 101,
        work_experience_id: 0,
        company_name: "Globex".into(),
        designation: "Lead".into(),
        start_date: date(2014, 3, 1),
        end_date: None,
        location: "Pune".into(),
        duration: String::new(),
    };
    assert!(repo.add_work_experience(TENANT, &entry).await.unwrap());
    let insert = &fx.procedures().calls_to(Procedure::InsertWorkExperience)[0];
    assert_eq!(insert.arg("emp_id_ip"), Some(&ProcArg::Int(101)));
    assert_eq!(insert.arg("from_date_ip"), Some(&ProcArg::Date(Some(date(2014, 3, 1)))));
    assert_eq!(insert.arg("to_date_ip"), Some(&ProcArg::Date(None)));
}

#[tokio::test]
async fn lenient_boundary_returns_defaults() {
    let procedures = ScriptedProcedures::new();
    procedures.fail(Procedure::GetEmployeeBasicDetails, "relation does not exist");
    procedures.fail(Procedure::GetEmployeeWorkExperience, "relation does not exist");
    procedures.fail(Procedure::InsertLanguage, "permission denied");
    let fx = Fixture::new(org_graph(), procedures);
    let lenient = Lenient::new(&fx.registry, &NoMetrics, Aggregation::Any);

    let details = lenient.basic_details(TENANT, 101).await;
    assert_eq!(details.employee_id, 101);
    assert!(details.first_name.is_empty());
    assert!(lenient.work_experience(TENANT, 101).await.is_empty());

    let language = LanguageDetails {
        employee_id: 101,
        language_details_id: 0,
        language_id: 4,
        language_name: String::new(),
    };
    assert!(!lenient.add_language(TENANT, &language).await);

    let blank = lenient.get_initiative(TENANT, 55).await;
    assert_eq!(blank.id, 55);
    assert!(blank.name.is_empty());
    assert_eq!(lenient.delete_initiative(TENANT, 55).await, false);
}
