use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::util::{default_audit_table_statement, default_table_statement, setup_audit_fk, setup_employee_fk, DefaultColumn};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager
            .create_type(schema.create_enum_from_active_enum::<RoleType>())
            .await?;

        manager
            .create_type(schema.create_enum_from_active_enum::<ReimbursementStatus>())
            .await?;

        manager
            .create_table(default_table_statement()
                .table(User::Table)
                .col(ColumnDef::new(User::Username)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(User::Salary)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(User::Role)
                    .custom(RoleType::name())
                    .not_null())
                .take()
            ).await?;

        manager
            .create_table(default_audit_table_statement()
                .table(PayrollPeriod::Table)
                .col(ColumnDef::new(PayrollPeriod::StartOn)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::EndOn)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::ProcessedAt)
                    .timestamp_with_time_zone()
                    .null())
                .check(Expr::col(PayrollPeriod::StartOn).lte(Expr::col(PayrollPeriod::EndOn)))
                .take()
            ).await?;
        setup_audit_fk(manager, PayrollPeriod::Table).await?;

        manager
            .create_table(default_audit_table_statement()
                .table(EmployeeAttendance::Table)
                .col(ColumnDef::new(EmployeeAttendance::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(EmployeeAttendance::AttendedOn)
                    .date()
                    .not_null())
                .col(ColumnDef::new(EmployeeAttendance::PayrollPeriodId)
                    .uuid()
                    .null())
                .take()
            ).await?;
        setup_audit_fk(manager, EmployeeAttendance::Table).await?;
        setup_employee_fk(manager, EmployeeAttendance::Table, EmployeeAttendance::EmployeeId).await?;
        setup_period_fk(manager, EmployeeAttendance::Table, EmployeeAttendance::PayrollPeriodId).await?;

        // One tap-in per employee per day
        manager
            .create_index(Index::create()
                .name("idx_employee_attendance_employee_day")
                .table(EmployeeAttendance::Table)
                .col(EmployeeAttendance::EmployeeId)
                .col(EmployeeAttendance::AttendedOn)
                .unique()
                .take()
            ).await?;

        manager
            .create_table(default_audit_table_statement()
                .table(EmployeeOvertime::Table)
                .col(ColumnDef::new(EmployeeOvertime::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(EmployeeOvertime::OvertimeOn)
                    .date()
                    .not_null())
                .col(ColumnDef::new(EmployeeOvertime::Hours)
                    .small_integer()
                    .not_null())
                .col(ColumnDef::new(EmployeeOvertime::PayrollPeriodId)
                    .uuid()
                    .null())
                .check(Expr::col(EmployeeOvertime::Hours).between(1, 3))
                .take()
            ).await?;
        setup_audit_fk(manager, EmployeeOvertime::Table).await?;
        setup_employee_fk(manager, EmployeeOvertime::Table, EmployeeOvertime::EmployeeId).await?;
        setup_period_fk(manager, EmployeeOvertime::Table, EmployeeOvertime::PayrollPeriodId).await?;

        manager
            .create_index(Index::create()
                .name("idx_employee_overtime_employee_day")
                .table(EmployeeOvertime::Table)
                .col(EmployeeOvertime::EmployeeId)
                .col(EmployeeOvertime::OvertimeOn)
                .unique()
                .take()
            ).await?;

        manager
            .create_table(default_audit_table_statement()
                .table(EmployeeReimbursement::Table)
                .col(ColumnDef::new(EmployeeReimbursement::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(EmployeeReimbursement::ClaimedOn)
                    .date()
                    .not_null())
                .col(ColumnDef::new(EmployeeReimbursement::Amount)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(EmployeeReimbursement::Description)
                    .text()
                    .not_null())
                .col(ColumnDef::new(EmployeeReimbursement::Status)
                    .custom(ReimbursementStatus::name())
                    .not_null())
                .col(ColumnDef::new(EmployeeReimbursement::PayrollPeriodId)
                    .uuid()
                    .null())
                .check(Expr::col(EmployeeReimbursement::Amount).gt(0))
                .take()
            ).await?;
        setup_audit_fk(manager, EmployeeReimbursement::Table).await?;
        setup_employee_fk(manager, EmployeeReimbursement::Table, EmployeeReimbursement::EmployeeId).await?;
        setup_period_fk(manager, EmployeeReimbursement::Table, EmployeeReimbursement::PayrollPeriodId).await?;

        manager
            .create_table(default_audit_table_statement()
                .table(EmployeePayslip::Table)
                .col(ColumnDef::new(EmployeePayslip::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(EmployeePayslip::PayrollPeriodId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(EmployeePayslip::Username)
                    .text()
                    .not_null())
                .col(ColumnDef::new(EmployeePayslip::BaseSalary)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(EmployeePayslip::WorkingDays)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(EmployeePayslip::AttendedDays)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(EmployeePayslip::ProratedSalary)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(EmployeePayslip::OvertimeHours)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(EmployeePayslip::OvertimePay)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(EmployeePayslip::TotalReimbursements)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(EmployeePayslip::TotalTakeHome)
                    .big_integer()
                    .not_null())
                .take()
            ).await?;
        setup_audit_fk(manager, EmployeePayslip::Table).await?;
        setup_employee_fk(manager, EmployeePayslip::Table, EmployeePayslip::EmployeeId).await?;
        setup_period_fk(manager, EmployeePayslip::Table, EmployeePayslip::PayrollPeriodId).await?;

        // At most one payslip per employee per period
        manager
            .create_index(Index::create()
                .name("idx_employee_payslip_employee_period")
                .table(EmployeePayslip::Table)
                .col(EmployeePayslip::EmployeeId)
                .col(EmployeePayslip::PayrollPeriodId)
                .unique()
                .take()
            ).await?;

        manager
            .create_table(default_audit_table_statement()
                .table(PayrollDetail::Table)
                .col(ColumnDef::new(PayrollDetail::PayrollPeriodId)
                    .uuid()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(PayrollDetail::TotalTakeHome)
                    .big_integer()
                    .not_null())
                .take()
            ).await?;
        setup_audit_fk(manager, PayrollDetail::Table).await?;
        setup_period_fk(manager, PayrollDetail::Table, PayrollDetail::PayrollPeriodId).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Dependents first
        for table in [
            PayrollDetail::Table.into_iden(),
            EmployeePayslip::Table.into_iden(),
            EmployeeReimbursement::Table.into_iden(),
            EmployeeOvertime::Table.into_iden(),
            EmployeeAttendance::Table.into_iden(),
            PayrollPeriod::Table.into_iden(),
            User::Table.into_iden(),
        ] {
            manager.drop_table(
                TableDropStatement::new()
                    .table(table)
                    .take()
            ).await?;
        }

        for name in [ReimbursementStatus::name(), RoleType::name()] {
            manager.drop_type(
                TypeDropStatement::new()
                    .name(name)
                    .to_owned()
            ).await?;
        }

        Ok(())
    }
}

async fn setup_period_fk<T: IntoIden + Clone + 'static>(manager: &SchemaManager<'_>, table: T, column: impl IntoIden) -> Result<(), DbErr> {
    manager.create_foreign_key(ForeignKeyCreateStatement::new()
        .from(table, column)
        .to(PayrollPeriod::Table, DefaultColumn::Id)
        .on_delete(ForeignKeyAction::Restrict)
        .on_update(ForeignKeyAction::Cascade)
        .take()
    ).await
}

#[derive(DeriveIden)]
pub(crate) enum User {
    Table,
    Username,
    Role,
    Salary,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_type")]
enum RoleType {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "employee")]
    Employee,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "reimbursement_status")]
enum ReimbursementStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
}

#[derive(DeriveIden)]
enum PayrollPeriod {
    Table,
    StartOn,
    EndOn,
    ProcessedAt,
}

#[derive(DeriveIden)]
enum EmployeeAttendance {
    Table,
    EmployeeId,
    AttendedOn,
    PayrollPeriodId,
}

#[derive(DeriveIden)]
enum EmployeeOvertime {
    Table,
    EmployeeId,
    OvertimeOn,
    Hours,
    PayrollPeriodId,
}

#[derive(DeriveIden)]
enum EmployeeReimbursement {
    Table,
    EmployeeId,
    ClaimedOn,
    Amount,
    Description,
    Status,
    PayrollPeriodId,
}

#[derive(DeriveIden)]
enum EmployeePayslip {
    Table,
    EmployeeId,
    PayrollPeriodId,
    Username,
    BaseSalary,
    WorkingDays,
    AttendedDays,
    ProratedSalary,
    OvertimeHours,
    OvertimePay,
    TotalReimbursements,
    TotalTakeHome,
}

#[derive(DeriveIden)]
enum PayrollDetail {
    Table,
    PayrollPeriodId,
    TotalTakeHome,
}
