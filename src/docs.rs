use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::modules::job::handler::run_job),
    components(schemas(
        crate::modules::job::dto::JobEnvelope,
        crate::modules::job::dto::JobRequest,
        crate::modules::job::dto::JobResponse,
        crate::modules::job::dto::JobSuccess,
        crate::modules::job::dto::JobFailure,
    )),
    tags((name = "Jobs", description = "Media processing jobs"))
)]
pub struct ApiDoc;
