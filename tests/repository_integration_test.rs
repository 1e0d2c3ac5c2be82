// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 文件数据库上的级联删除、约束与多仓储共享连接
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use project_staffing::db::{read_schema_version, CURRENT_SCHEMA_VERSION};
use project_staffing::domain::{NewConsultant, NewMilestone, NewProject};
use project_staffing::logging;
use project_staffing::repository::{
    AssignmentRepository, ConsultantRepository, MetadataRepository, MilestoneRepository,
    ProjectRepository, RepositoryError,
};
use std::sync::{Arc, Mutex};
use test_helpers::{create_test_db, date, open_test_conn};

struct Repos {
    consultants: ConsultantRepository,
    projects: ProjectRepository,
    milestones: MilestoneRepository,
    assignments: AssignmentRepository,
    metadata: MetadataRepository,
}

fn shared_repos(db_path: &str) -> Repos {
    let conn = Arc::new(Mutex::new(open_test_conn(db_path)));
    Repos {
        consultants: ConsultantRepository::from_connection(conn.clone()),
        projects: ProjectRepository::from_connection(conn.clone()),
        milestones: MilestoneRepository::from_connection(conn.clone()),
        assignments: AssignmentRepository::from_connection(conn.clone()),
        metadata: MetadataRepository::from_connection(conn),
    }
}

fn project(no: i64, start: NaiveDate, end: Option<NaiveDate>) -> NewProject {
    NewProject {
        project_no: no,
        name: format!("Project {}", no),
        start_date: start,
        end_date: end,
    }
}

#[test]
fn test_schema_version_已写入() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_conn(&db_path);
    assert_eq!(
        read_schema_version(&conn).unwrap(),
        Some(CURRENT_SCHEMA_VERSION)
    );
}

#[test]
fn test_delete_project_级联() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().unwrap();
    let r = shared_repos(&db_path);

    let c1 = r.consultants.insert(&NewConsultant::new(1, "Ada", "Dev")).unwrap();
    let c2 = r.consultants.insert(&NewConsultant::new(2, "Bo", "Dev")).unwrap();
    let p1 = r.projects.insert(&project(10, date(2024, 1, 1), None)).unwrap();
    let p2 = r.projects.insert(&project(20, date(2024, 1, 1), None)).unwrap();
    for (c, p) in [(c1, p1), (c2, p1), (c1, p2)] {
        r.assignments.insert(c, p).unwrap();
    }
    r.milestones
        .insert(&NewMilestone {
            milestone_no: 1,
            name: "Kickoff".to_string(),
            date: date(2024, 2, 1),
            project_no: 10,
        })
        .unwrap();

    let deletion = r.projects.delete(10).unwrap();
    assert_eq!(deletion.removed_milestones, 1);
    assert_eq!(deletion.removed_assignments, 2);

    assert!(r.projects.find_by_no(10).unwrap().is_none());
    assert_eq!(r.milestones.count_for_project_id(p1).unwrap(), 0);
    assert!(r.assignments.find_by_project_id(p1).unwrap().is_empty());
    // 其他项目不受影响
    assert_eq!(r.assignments.find_by_project_id(p2).unwrap().len(), 1);
}

#[test]
fn test_delete_consultant_级联() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let r = shared_repos(&db_path);

    let c1 = r.consultants.insert(&NewConsultant::new(1, "Ada", "Dev")).unwrap();
    let p1 = r.projects.insert(&project(10, date(2024, 1, 1), None)).unwrap();
    let p2 = r.projects.insert(&project(20, date(2024, 1, 1), None)).unwrap();
    r.assignments.insert(c1, p1).unwrap();
    r.assignments.insert(c1, p2).unwrap();

    assert_eq!(r.consultants.delete(1).unwrap(), 2);
    assert!(r.assignments.find_by_consultant_id(c1).unwrap().is_empty());
    assert!(matches!(
        r.consultants.delete(1),
        Err(RepositoryError::NotFound { .. })
    ));
}

#[test]
fn test_foreign_key_约束() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let r = shared_repos(&db_path);

    let err = r.assignments.insert(999, 999).unwrap_err();
    assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
}

#[test]
fn test_hours_check_约束() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let r = shared_repos(&db_path);

    let c = r.consultants.insert(&NewConsultant::new(1, "Ada", "Dev")).unwrap();
    let p = r.projects.insert(&project(10, date(2024, 1, 1), None)).unwrap();
    r.assignments.insert(c, p).unwrap();

    let err = r.assignments.update_hours(c, p, -5).unwrap_err();
    assert!(matches!(err, RepositoryError::CheckConstraintViolation(_)));
    assert_eq!(r.assignments.find(c, p).unwrap().unwrap().hours_worked, 0);
}

#[test]
fn test_数据跨连接持久化() {
    let (_tmp, db_path) = create_test_db().unwrap();
    {
        let repo = ConsultantRepository::new(&db_path).unwrap();
        repo.insert(&NewConsultant::new(5, "Eva", "Lead")).unwrap();
    }
    let repo = ConsultantRepository::new(&db_path).unwrap();
    let eva = repo.find_by_no(5).unwrap().unwrap();
    assert_eq!(eva.title, "Lead");
}

#[test]
fn test_metadata_largest_table() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let r = shared_repos(&db_path);

    r.consultants.insert(&NewConsultant::new(1, "Ada", "Dev")).unwrap();
    r.consultants.insert(&NewConsultant::new(2, "Bo", "Dev")).unwrap();
    r.consultants.insert(&NewConsultant::new(3, "Cy", "Dev")).unwrap();
    r.projects.insert(&project(10, date(2024, 1, 1), None)).unwrap();

    let largest = r.metadata.largest_table().unwrap().unwrap();
    assert_eq!(largest.table_name, "Consultant");
    assert_eq!(largest.row_count, 3);
    assert!(!r.metadata.table_names().unwrap().contains(&"schema_version".to_string()));
}
