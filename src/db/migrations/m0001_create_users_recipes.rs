use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::RecipeLimit).integer().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recipes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Recipes::UserId).string().not_null())
                    .col(ColumnDef::new(Recipes::Title).string().not_null())
                    .col(ColumnDef::new(Recipes::Description).string().not_null())
                    .col(ColumnDef::new(Recipes::Ingredients).text().not_null())
                    .col(ColumnDef::new(Recipes::Steps).text().not_null())
                    .col(ColumnDef::new(Recipes::ServingSize).integer().not_null())
                    .col(ColumnDef::new(Recipes::CookingTime).integer().not_null())
                    .col(ColumnDef::new(Recipes::Difficulty).string().not_null())
                    .col(ColumnDef::new(Recipes::CuisineType).string().not_null())
                    .col(ColumnDef::new(Recipes::MeatType).string().not_null())
                    .col(ColumnDef::new(Recipes::DietaryTags).text().not_null())
                    .col(
                        ColumnDef::new(Recipes::IsFavorite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Recipes::ImagePath).string().null())
                    .col(ColumnDef::new(Recipes::ThumbnailPath).string().null())
                    .col(
                        ColumnDef::new(Recipes::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_user")
                            .from(Recipes::Table, Recipes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_user_created")
                    .table(Recipes::Table)
                    .col(Recipes::UserId)
                    .col(Recipes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    RecipeLimit,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Ingredients,
    Steps,
    ServingSize,
    CookingTime,
    Difficulty,
    CuisineType,
    MeatType,
    DietaryTags,
    IsFavorite,
    ImagePath,
    ThumbnailPath,
    CreatedAt,
}
