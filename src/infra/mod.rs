pub mod controller;
pub mod database;
pub mod service;

pub mod router {
    use salvo::{logging::Logger, routing::PathFilter, Router};

    use super::controller::{event::*, hardware::*, iam::*, registration::*, review::*, Context};

    pub fn app(ctx: Context) -> Router {
        PathFilter::register_wisp_regex(
            "uuid",
            regex::Regex::new(
                "^(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
            )
            .expect("Expect a valid uuid regex"),
        );

        Router::new()
            .push(
                Router::with_path("api")
                    .push(iam(&ctx))
                    .push(registration(&ctx))
                    .push(event(&ctx))
                    .push(review(&ctx))
                    .push(hardware(&ctx)),
            )
            .hoop(Logger)
    }

    fn iam(ctx: &Context) -> Router {
        Router::new()
            .push(
                Router::with_path("auth")
                    .push(Router::with_path("signup").post(SignUpController::new(ctx.clone())))
                    .push(
                        Router::with_path("login")
                            .post(AuthenticateUserController::new(ctx.clone())),
                    ),
            )
            .push(
                Router::with_path("user")
                    .get(CurrentUserController::new(ctx.clone()))
                    .push(
                        Router::with_path("password")
                            .put(ChangePasswordController::new(ctx.clone())),
                    ),
            )
    }

    fn registration(ctx: &Context) -> Router {
        Router::with_path("registration")
            .push(Router::with_path("dashboard").get(DashboardController::new(ctx.clone())))
            .push(Router::with_path("resume").put(UploadResumeController::new(ctx.clone())))
            .push(
                Router::with_path("application")
                    .post(SubmitApplicationController::new(ctx.clone()))
                    .get(GetApplicationController::new(ctx.clone()))
                    .push(Router::with_path("rsvp").put(RsvpController::new(ctx.clone()))),
            )
            .push(
                Router::with_path("team")
                    .get(GetTeamController::new(ctx.clone()))
                    .push(Router::with_path("join").post(JoinTeamController::new(ctx.clone())))
                    .push(Router::with_path("leave").post(LeaveTeamController::new(ctx.clone()))),
            )
    }

    fn event(ctx: &Context) -> Router {
        Router::with_path("event")
            .get(EventInfoController::new(ctx.clone()))
            .push(
                Router::with_path("profile")
                    .post(CreateProfileController::new(ctx.clone()))
                    .get(CurrentProfileController::new(ctx.clone()))
                    .put(UpdateCurrentProfileController::new(ctx.clone())),
            )
            .push(
                Router::with_path("profiles/<id:uuid>")
                    .put(UpdateProfileController::new(ctx.clone()))
                    .delete(DeleteProfileController::new(ctx.clone())),
            )
            .push(Router::with_path("sign-in").post(SignInController::new(ctx.clone())))
    }

    fn review(ctx: &Context) -> Router {
        Router::with_path("review")
            .push(Router::with_path("users").get(ListUsersReviewStatusController::new(ctx.clone())))
            .push(
                Router::with_path("applications")
                    .get(ListApplicationsController::new(ctx.clone()))
                    .push(
                        Router::with_path("<id:uuid>")
                            .put(ReviewApplicationController::new(ctx.clone())),
                    ),
            )
            .push(Router::with_path("decisions").post(SendDecisionsController::new(ctx.clone())))
    }

    fn hardware(ctx: &Context) -> Router {
        Router::with_path("hardware")
            .get(ListHardwareController::new(ctx.clone()))
            .post(CreateHardwareController::new(ctx.clone()))
            .push(
                Router::with_path("orders")
                    .get(TeamOrdersController::new(ctx.clone()))
                    .post(PlaceOrderController::new(ctx.clone()))
                    .push(
                        Router::with_path("<id:uuid>/cancel")
                            .post(CancelOrderController::new(ctx.clone())),
                    )
                    .push(
                        Router::with_path("<id:uuid>/status")
                            .put(UpdateOrderStatusController::new(ctx.clone())),
                    ),
            )
    }
}
