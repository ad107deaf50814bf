//! Resource listings.
//!
//! Each listing is a fetch followed by a short extraction pipeline. Listings
//! never decide whether a resource passes a check; they only shape data.

use crate::client::ClientFactory;
use crate::error::{FetchResult, ProviderError};
use crate::fetch::{FetchEngine, FetchRequest};
use crate::signature::CallSignature;
use crate::value::Value;

/// Which profiles and regions a listing fans out over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub profiles: Option<Vec<String>>,
    pub regions: Option<Vec<String>>,
}

impl Scope {
    /// Current credentials, every discovered region.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles = Some(profiles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    fn request(&self, service: &str, method: &str) -> FetchRequest {
        FetchRequest {
            profiles: self.profiles.clone(),
            regions: self.regions.clone(),
            ..FetchRequest::new(service, method)
        }
    }
}

/// Substitute an empty object when the provider reports one of `codes`;
/// anything else becomes a structured error value.
fn empty_on<'a>(codes: &'a [&'a str]) -> impl Fn(&ProviderError, &CallSignature) -> Value + 'a {
    move |err, _sig| {
        if codes.contains(&err.code.as_str()) {
            Value::object()
        } else {
            Value::from(serde_json::json!({
                "Error": {"Code": err.code, "Message": err.message}
            }))
        }
    }
}

/// All EC2 instances.
pub fn ec2_instances<F: ClientFactory>(
    engine: &mut FetchEngine<F>,
    scope: &Scope,
) -> FetchResult<Vec<Value>> {
    Ok(engine
        .query(&scope.request("ec2", "describe_instances"), None)?
        .extract_key_or("Reservations", Value::Array(vec![]))
        .flatten()?
        .extract_key_or("Instances", Value::Array(vec![]))
        .flatten()?
        .values())
}

/// All EC2 security groups.
pub fn ec2_security_groups<F: ClientFactory>(
    engine: &mut FetchEngine<F>,
    scope: &Scope,
) -> FetchResult<Vec<Value>> {
    Ok(engine
        .query(&scope.request("ec2", "describe_security_groups"), None)?
        .extract_key_or("SecurityGroups", Value::Array(vec![]))
        .flatten()?
        .values())
}

/// All S3 buckets.
pub fn s3_buckets<F: ClientFactory>(
    engine: &mut FetchEngine<F>,
    scope: &Scope,
) -> FetchResult<Vec<Value>> {
    Ok(engine
        .query(&scope.request("s3", "list_buckets"), None)?
        .extract_key_or("Buckets", Value::Array(vec![]))
        .flatten()?
        .values())
}

/// Bucket policy documents for `bucket`; `null` where the bucket has none.
pub fn s3_bucket_policy<F: ClientFactory>(
    engine: &mut FetchEngine<F>,
    scope: &Scope,
    bucket: &str,
) -> FetchResult<Vec<Value>> {
    let request = scope
        .request("s3", "get_bucket_policy")
        .kwarg("Bucket", bucket);
    let on_error = empty_on(&["NoSuchBucketPolicy"]);
    Ok(engine
        .query(&request, Some(&on_error))?
        .extract_key("Policy")
        .values())
}

/// All IAM users.
pub fn iam_users<F: ClientFactory>(
    engine: &mut FetchEngine<F>,
    scope: &Scope,
) -> FetchResult<Vec<Value>> {
    Ok(engine
        .query(&scope.request("iam", "list_users"), None)?
        .extract_key_or("Users", Value::Array(vec![]))
        .flatten()?
        .values())
}

/// Inline policy names attached to `user_name`, as plain strings.
pub fn iam_inline_policy_names<F: ClientFactory>(
    engine: &mut FetchEngine<F>,
    scope: &Scope,
    user_name: &str,
) -> FetchResult<Vec<Value>> {
    let request = scope
        .request("iam", "list_user_policies")
        .kwarg("UserName", user_name);
    let on_error = empty_on(&["NoSuchEntity"]);
    Ok(engine
        .query(&request, Some(&on_error))?
        .extract_key_or("PolicyNames", Value::Array(vec![]))
        .flatten()?
        .values())
}

/// All RDS DB instances.
pub fn rds_db_instances<F: ClientFactory>(
    engine: &mut FetchEngine<F>,
    scope: &Scope,
) -> FetchResult<Vec<Value>> {
    Ok(engine
        .query(&scope.request("rds", "describe_db_instances"), None)?
        .extract_key_or("DBInstances", Value::Array(vec![]))
        .flatten()?
        .values())
}
