use sea_orm_migration::prelude::*;

use crate::m20250701_020000_payroll_schema::User;

const EMPLOYEES: u128 = 100;
const ADMIN_ID: u128 = 12345;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn seeded_id(i: u128) -> SimpleExpr {
    Expr::val(format!("{i:032x}")).cast_as("uuid")
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let time = Expr::val("2025-07-01T02:01:00.000Z").cast_as("timestamptz");

        // Employees named after their index, with a monthly salary between 5 and 20 million
        for i in 1..=EMPLOYEES {
            let salary: i64 = rand::random_range(5_000_000..=20_000_000);

            manager
                .exec_stmt(Query::insert()
                    .into_table(User::Table)
                    .columns(["id", "created_at", "updated_at", "username", "role", "salary"])
                    .values([seeded_id(i), time.clone(), time.clone(), i.to_string().into(), Expr::val("employee").cast_as("role_type"), salary.into()])
                    .map_err(|e| DbErr::Migration(e.to_string()))?
                    .to_owned()
            ).await?;
        }

        // Admins run payroll but are not on it
        manager
            .exec_stmt(Query::insert()
                .into_table(User::Table)
                .columns(["id", "created_at", "updated_at", "username", "role", "salary"])
                .values([seeded_id(ADMIN_ID), time.clone(), time.clone(), "admin".into(), Expr::val("admin").cast_as("role_type"), 0i64.into()])
                .map_err(|e| DbErr::Migration(e.to_string()))?
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let ids = (1..=EMPLOYEES)
            .chain([ADMIN_ID])
            .map(seeded_id);

        manager
            .exec_stmt(Query::delete()
                .from_table(User::Table)
                .and_where(Expr::col("id").is_in(ids))
                .to_owned()
        ).await?;

        Ok(())
    }
}
