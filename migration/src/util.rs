use sea_orm_migration::prelude::*;

pub(crate) fn default_table_statement() -> TableCreateStatement {
    TableCreateStatement::new()
        .if_not_exists()
        .col(ColumnDef::new(DefaultColumn::Id)
            .uuid()
            .primary_key()
            .default(Expr::cust("GEN_RANDOM_UUID()"))
            .take())
        .col(ColumnDef::new(DefaultColumn::CreatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .take())
        .col(ColumnDef::new(DefaultColumn::UpdatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .take())
        .take()
}

#[derive(DeriveIden)]
pub(crate) enum DefaultColumn {
    Id,
    CreatedAt,
    UpdatedAt,
}

/// Table statement carrying `created_by` and `updated_by` on top of the default columns
///
/// Must be followed by [`setup_audit_fk`] once the table exists
pub(crate) fn default_audit_table_statement() -> TableCreateStatement {
    default_table_statement()
        .col(ColumnDef::new(DefaultAuditColumn::CreatedBy)
            .uuid())
        .col(ColumnDef::new(DefaultAuditColumn::UpdatedBy)
            .uuid())
        .take()
}

pub(crate) async fn setup_audit_fk<T: IntoIden + Clone + 'static>(manager: &SchemaManager<'_>, table: T) -> Result<(), DbErr> {
    for column in [DefaultAuditColumn::CreatedBy, DefaultAuditColumn::UpdatedBy] {
        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(table.clone(), column)
            .to(UserTable::Table, DefaultColumn::Id)
            .on_delete(ForeignKeyAction::SetNull)
            .on_update(ForeignKeyAction::Cascade)
            .take()
        ).await?;
    }

    Ok(())
}

/// Points `column` of `table` at a `user` row, cascading with it
pub(crate) async fn setup_employee_fk<T: IntoIden + Clone + 'static>(manager: &SchemaManager<'_>, table: T, column: impl IntoIden) -> Result<(), DbErr> {
    manager.create_foreign_key(ForeignKeyCreateStatement::new()
        .from(table, column)
        .to(UserTable::Table, DefaultColumn::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .take()
    ).await
}

#[derive(DeriveIden)]
pub(crate) enum DefaultAuditColumn {
    CreatedBy,
    UpdatedBy,
}

#[derive(DeriveIden)]
enum UserTable {
    #[sea_orm(iden = "user")]
    Table,
}
