use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lectures::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Lectures::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Lectures::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Lectures::Title).string().not_null())
                    .col(ColumnDef::new(Lectures::Description).string().not_null())
                    .col(ColumnDef::new(Lectures::VideoPublicId).string().not_null())
                    .col(ColumnDef::new(Lectures::VideoSecureUrl).string().not_null())
                    .col(
                        ColumnDef::new(Lectures::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Lectures::Table, Lectures::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Lectures::Table)
                    .col(Lectures::CourseId)
                    .name("idx_lectures_course_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lectures::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Lectures {
    Table,
    Id,
    CourseId,
    Title,
    Description,
    VideoPublicId,
    VideoSecureUrl,
    CreatedAt,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
}
